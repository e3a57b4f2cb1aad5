use tracing::{debug, info, warn};
use uuid::Uuid;

use super::planner::{require_text, Planner};
use super::store::DocumentStore;
use super::types::*;
use crate::error::{PlannerError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TaskCommand {
    AddTask(Task),
    UpdateTask(TaskId, TaskUpdate),
    RemoveTask(TaskId),
}

pub(crate) fn recompute_filled_capacity(member: &mut MemberCapacity) {
    member.filled_capacity = member.tasks.iter().map(|task| task.time).sum();
    debug!(
        member_id = %member.member_id,
        filled_capacity = member.filled_capacity,
        max_capacity = member.max_capacity,
        "recomputed filled capacity"
    );
    if member.is_over_allocated() {
        warn!(
            member_id = %member.member_id,
            filled_capacity = member.filled_capacity,
            max_capacity = member.max_capacity,
            "member is over-allocated"
        );
    }
}

fn validate_time(time: Hours) -> Result<Hours> {
    if !time.is_finite() || time <= 0.0 {
        return Err(PlannerError::validation(format!(
            "time must be a positive number of hours, got {time}"
        )));
    }
    Ok(time)
}

fn validate_update(update: TaskUpdate) -> Result<TaskUpdate> {
    if update.is_empty() {
        return Err(PlannerError::validation(
            "description, clientName or time must be provided",
        ));
    }
    Ok(TaskUpdate {
        description: update.description.map(|d| require_text("description", &d)).transpose()?,
        client_name: update.client_name.map(|c| require_text("clientName", &c)).transpose()?,
        time: update.time.map(validate_time).transpose()?,
    })
}

fn locate_task(sprint: &Sprint, task_id: &str) -> Option<(usize, usize)> {
    sprint
        .team_snapshot
        .iter()
        .enumerate()
        .find_map(|(member_index, member)| {
            member
                .tasks
                .iter()
                .position(|task| task.task_id == task_id)
                .map(|task_index| (member_index, task_index))
        })
}

/// On error the sprint is left as it was.
pub(crate) fn execute_command(sprint: &mut Sprint, command: TaskCommand) -> Result<Task> {
    match command {
        TaskCommand::AddTask(task) => {
            if locate_task(sprint, &task.task_id).is_some() {
                return Err(PlannerError::validation(format!(
                    "task {} already exists in sprint {}",
                    task.task_id, sprint.sprint_id
                )));
            }
            let member = sprint
                .team_snapshot
                .iter_mut()
                .find(|m| m.member_id == task.assigned_to_member_id)
                .ok_or_else(|| PlannerError::not_found("member", task.assigned_to_member_id.as_str()))?;
            member.tasks.push(task.clone());
            recompute_filled_capacity(member);
            Ok(task)
        }
        TaskCommand::UpdateTask(task_id, update) => {
            let (member_index, task_index) = locate_task(sprint, &task_id)
                .ok_or_else(|| PlannerError::not_found("task", task_id.as_str()))?;
            let member = &mut sprint.team_snapshot[member_index];
            let task = &mut member.tasks[task_index];
            if let Some(description) = update.description {
                task.description = description;
            }
            if let Some(client_name) = update.client_name {
                task.client_name = client_name;
            }
            if let Some(time) = update.time {
                task.time = time;
            }
            let updated = task.clone();
            recompute_filled_capacity(member);
            Ok(updated)
        }
        TaskCommand::RemoveTask(task_id) => {
            let (member_index, task_index) = locate_task(sprint, &task_id)
                .ok_or_else(|| PlannerError::not_found("task", task_id.as_str()))?;
            let member = &mut sprint.team_snapshot[member_index];
            let removed = member.tasks.remove(task_index);
            recompute_filled_capacity(member);
            Ok(removed)
        }
    }
}

impl<S: DocumentStore> Planner<S> {
    pub fn add_task(
        &mut self,
        sprint_id: &str,
        member_id: &str,
        description: &str,
        client_name: &str,
        time: Hours,
    ) -> Result<Task> {
        let task = Task {
            task_id: Uuid::new_v4().to_string(),
            description: require_text("description", description)?,
            client_name: require_text("clientName", client_name)?,
            time: validate_time(time)?,
            assigned_to_member_id: member_id.to_string(),
        };

        let task = self.apply(sprint_id, TaskCommand::AddTask(task))?;
        info!(sprint_id, member_id, task_id = %task.task_id, time = task.time, "added task");
        Ok(task)
    }

    /// Edits description, client or hours. The assignee cannot change; move a
    /// task by removing it and adding it again.
    pub fn update_task(&mut self, sprint_id: &str, task_id: &str, update: TaskUpdate) -> Result<Task> {
        let update = validate_update(update)?;
        let task = self.apply(sprint_id, TaskCommand::UpdateTask(task_id.to_string(), update))?;
        info!(sprint_id, task_id, "updated task");
        Ok(task)
    }

    pub fn remove_task(&mut self, sprint_id: &str, task_id: &str) -> Result<Task> {
        let task = self.apply(sprint_id, TaskCommand::RemoveTask(task_id.to_string()))?;
        info!(sprint_id, task_id, member_id = %task.assigned_to_member_id, "removed task");
        Ok(task)
    }

    pub fn list_tasks(&self, sprint_id: &str) -> Result<Vec<Task>> {
        let sprint = self.load_sprint(sprint_id)?;
        Ok(sprint
            .team_snapshot
            .into_iter()
            .flat_map(|member| member.tasks)
            .collect())
    }

    fn apply(&mut self, sprint_id: &str, command: TaskCommand) -> Result<Task> {
        let mut sprint = self.load_sprint(sprint_id)?;
        let task = execute_command(&mut sprint, command)?;
        self.save_sprint(&sprint)?;
        Ok(task)
    }
}
