use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type MemberId = String;
pub type SprintId = String;
pub type TaskId = String;
pub type Hours = f64;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub task_id: TaskId,
    pub description: String,
    pub client_name: String,
    pub time: Hours,
    pub assigned_to_member_id: MemberId,
}

/// A member's capacity within one sprint.
///
/// `name` and `emoji` are copies taken when the sprint was created, so later
/// roster edits leave the sprint untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberCapacity {
    pub member_id: MemberId,
    pub name: String,
    pub emoji: String,
    pub max_capacity: Hours,
    pub filled_capacity: Hours,
    pub tasks: Vec<Task>,
}

impl MemberCapacity {
    pub fn remaining(&self) -> Hours {
        self.max_capacity - self.filled_capacity
    }

    pub fn is_over_allocated(&self) -> bool {
        self.filled_capacity > self.max_capacity
    }

    /// Filled capacity as a percentage of max capacity; 0 when there is no capacity.
    pub fn utilization(&self) -> f64 {
        if self.max_capacity > 0.0 {
            self.filled_capacity / self.max_capacity * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub sprint_id: SprintId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_working_days: u32,
    pub team_snapshot: Vec<MemberCapacity>,
}

impl Sprint {
    pub fn member(&self, member_id: &str) -> Option<&MemberCapacity> {
        self.team_snapshot.iter().find(|m| m.member_id == member_id)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn total_max_capacity(&self) -> Hours {
        self.team_snapshot.iter().map(|m| m.max_capacity).sum()
    }

    pub fn total_filled_capacity(&self) -> Hours {
        self.team_snapshot.iter().map(|m| m.filled_capacity).sum()
    }
}

/// Fields of a task that may be edited after creation. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub description: Option<String>,
    pub client_name: Option<String>,
    pub time: Option<Hours>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.client_name.is_none() && self.time.is_none()
    }
}
