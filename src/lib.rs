//! Sprint capacity planning.
//!
//! Tracks a team roster, time-boxed sprints that freeze a capacity snapshot
//! of the roster when they are created, and the tasks assigned to each
//! member inside a sprint. A member's filled capacity always equals the
//! hours of their tasks; workload metrics roll those snapshots up by client
//! and by member across sprints.
//!
//! Records live in a [`capacity::DocumentStore`]: `<data>/members.yaml` for
//! the roster and `<data>/sprint-<timestamp>.yaml` for each sprint when the
//! file-backed store is used.

pub mod capacity;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{PlannerError, StoreError};
