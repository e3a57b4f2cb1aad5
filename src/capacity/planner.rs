use tracing::debug;

use super::store::{self, DocumentStore, ROSTER_KEY};
use super::types::*;
use crate::error::{PlannerError, Result};

/// Holds no cached state. Concurrent writers to the same record are last-write-wins.
#[derive(Debug)]
pub struct Planner<S> {
    store: S,
}

impl<S: DocumentStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Planner { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Reads the roster; a store without one has an empty roster.
    pub(crate) fn load_roster(&self) -> Result<Vec<TeamMember>> {
        match store::load(&self.store, ROSTER_KEY) {
            Ok(members) => Ok(members),
            Err(e) if e.is_not_found() => {
                debug!("no roster record yet, treating as empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn save_roster(&mut self, members: &[TeamMember]) -> Result<()> {
        store::save(&mut self.store, ROSTER_KEY, &members)?;
        Ok(())
    }

    pub(crate) fn load_sprint(&self, sprint_id: &str) -> Result<Sprint> {
        if !is_sprint_key(sprint_id) {
            return Err(PlannerError::not_found("sprint", sprint_id));
        }
        store::load(&self.store, sprint_id).map_err(|e| {
            if e.is_not_found() {
                PlannerError::not_found("sprint", sprint_id)
            } else {
                e.into()
            }
        })
    }

    pub(crate) fn save_sprint(&mut self, sprint: &Sprint) -> Result<()> {
        store::save(&mut self.store, &sprint.sprint_id, sprint)?;
        Ok(())
    }
}

pub(crate) fn is_sprint_key(key: &str) -> bool {
    key.len() > store::SPRINT_KEY_PREFIX.len() && key.starts_with(store::SPRINT_KEY_PREFIX)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PlannerError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}
