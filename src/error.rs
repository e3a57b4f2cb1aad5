//! Error types for sprint capacity planning.
//!
//! Three kinds of failure reach callers:
//! - validation failures (malformed or missing input)
//! - references to sprints, members or tasks that do not exist
//! - storage failures, surfaced as-is without retry

/// Failure raised by a [`DocumentStore`](crate::capacity::DocumentStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record is stored under the key
    #[error("record '{key}' not found")]
    NotFound { key: String },

    /// The underlying read or write failed
    #[error("i/o error on record '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be encoded or decoded
    #[error("malformed record '{key}': {message}")]
    Codec { key: String, message: String },
}

impl StoreError {
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure of a planner operation.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Caller supplied malformed or missing input
    #[error("validation failed: {0}")]
    Validation(String),

    /// A referenced sprint, member or task does not exist
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// The document store failed
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl PlannerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }

    /// HTTP-equivalent status for the presentation layer.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Storage(_) => 500,
        }
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PlannerError::validation("bad").status_code(), 400);
        assert_eq!(PlannerError::not_found("sprint", "sprint-x").status_code(), 404);
        let storage = PlannerError::from(StoreError::Codec {
            key: "members".to_string(),
            message: "oops".to_string(),
        });
        assert_eq!(storage.status_code(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = PlannerError::not_found("task", "abc");
        assert_eq!(err.to_string(), "task 'abc' not found");
    }
}
