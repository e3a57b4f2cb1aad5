//! Workload metrics across sprints.
//!
//! Aggregation reads the frozen `max_capacity` / `filled_capacity` and member
//! names stored in each sprint, never the live roster, so historical figures
//! stay put as the team changes.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use super::planner::Planner;
use super::store::DocumentStore;
use super::types::*;
use crate::error::Result;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientWorkload {
    pub client_name: String,
    pub total_hours: Hours,
    pub percentage: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemberWorkload {
    pub member_id: MemberId,
    pub name: String,
    pub emoji: String,
    pub total_hours: Hours,
    pub total_capacity: Hours,
    pub percentage: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub client_workloads: Vec<ClientWorkload>,
    pub member_workloads: Vec<MemberWorkload>,
    pub average_percentage: f64,
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn calculate_client_workloads(sprints: &[Sprint]) -> Vec<ClientWorkload> {
    let mut client_hours: IndexMap<&str, Hours> = IndexMap::new();
    for task in sprints
        .iter()
        .flat_map(|sprint| &sprint.team_snapshot)
        .flat_map(|member| &member.tasks)
    {
        *client_hours.entry(task.client_name.as_str()).or_insert(0.0) += task.time;
    }
    let total_hours: Hours = client_hours.values().sum();

    let mut workloads: Vec<ClientWorkload> = client_hours
        .into_iter()
        .map(|(client_name, hours)| ClientWorkload {
            client_name: client_name.to_string(),
            total_hours: hours,
            percentage: percentage(hours, total_hours),
        })
        .collect();
    workloads.sort_by(|a, b| b.total_hours.total_cmp(&a.total_hours));
    workloads
}

/// Display name and emoji come from the member's most recent sprint (latest
/// start date, then highest sprint id), whatever order `sprints` is in.
pub fn calculate_member_workloads(sprints: &[Sprint]) -> Vec<MemberWorkload> {
    let mut ordered: Vec<&Sprint> = sprints.iter().collect();
    ordered.sort_by(|a, b| {
        a.start_date
            .cmp(&b.start_date)
            .then_with(|| a.sprint_id.cmp(&b.sprint_id))
    });

    let mut members: IndexMap<&str, MemberWorkload> = IndexMap::new();
    for member in ordered.iter().copied().flat_map(|sprint| &sprint.team_snapshot) {
        let workload = members
            .entry(member.member_id.as_str())
            .or_insert_with(|| MemberWorkload {
                member_id: member.member_id.clone(),
                name: String::new(),
                emoji: String::new(),
                total_hours: 0.0,
                total_capacity: 0.0,
                percentage: 0.0,
            });
        workload.name.clone_from(&member.name);
        workload.emoji.clone_from(&member.emoji);
        workload.total_hours += member.filled_capacity;
        workload.total_capacity += member.max_capacity;
    }

    let mut workloads: Vec<MemberWorkload> = members
        .into_values()
        .map(|mut workload| {
            workload.percentage = percentage(workload.total_hours, workload.total_capacity);
            workload
        })
        .collect();
    workloads.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    workloads
}

pub fn calculate_average_member_workload(member_workloads: &[MemberWorkload]) -> f64 {
    if member_workloads.is_empty() {
        return 0.0;
    }
    let total: f64 = member_workloads.iter().map(|m| m.percentage).sum();
    total / member_workloads.len() as f64
}

pub fn dashboard_metrics(sprints: &[Sprint]) -> DashboardMetrics {
    let member_workloads = calculate_member_workloads(sprints);
    DashboardMetrics {
        client_workloads: calculate_client_workloads(sprints),
        average_percentage: calculate_average_member_workload(&member_workloads),
        member_workloads,
    }
}

impl<S: DocumentStore> Planner<S> {
    /// Metrics over every readable sprint; unreadable records are skipped.
    pub fn dashboard(&self) -> Result<DashboardMetrics> {
        let sprints = self.list_readable_sprints()?;
        let metrics = dashboard_metrics(&sprints);
        debug!(
            sprints = sprints.len(),
            clients = metrics.client_workloads.len(),
            members = metrics.member_workloads.len(),
            "computed dashboard metrics"
        );
        Ok(metrics)
    }
}
