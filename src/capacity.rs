pub mod types;
pub mod calendar;
pub mod store;
mod planner;
mod roster;
pub mod snapshot;
mod ledger;
pub mod workload;

#[cfg(test)]
mod tests;

// Re-export the main types for easy access
pub use types::*;
pub use calendar::{parse_date, working_days, HOURS_PER_WORKING_DAY};
pub use store::{DocumentStore, FileStore, MemoryStore};
pub use planner::Planner;
pub use workload::{
    calculate_average_member_workload, calculate_client_workloads, calculate_member_workloads,
    ClientWorkload, DashboardMetrics, MemberWorkload,
};
