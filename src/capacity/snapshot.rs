use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};

use super::calendar::{max_capacity, working_days};
use super::planner::{is_sprint_key, require_text, Planner};
use super::store::{self, DocumentStore, SPRINT_KEY_PREFIX};
use super::types::*;
use crate::error::{PlannerError, Result};

pub fn build_team_snapshot(roster: &[TeamMember], total_working_days: u32) -> Vec<MemberCapacity> {
    roster
        .iter()
        .map(|member| MemberCapacity {
            member_id: member.id.clone(),
            name: member.name.clone(),
            emoji: member.emoji.clone(),
            max_capacity: max_capacity(total_working_days),
            filled_capacity: 0.0,
            tasks: Vec::new(),
        })
        .collect()
}

fn base_sprint_id(created_at: DateTime<Utc>) -> SprintId {
    format!("{SPRINT_KEY_PREFIX}{}", created_at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}

fn sort_newest_first(sprints: &mut [Sprint]) {
    sprints.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.sprint_id.cmp(&a.sprint_id))
    });
}

impl<S: DocumentStore> Planner<S> {
    pub fn create_sprint(&mut self, name: &str, start_date: NaiveDate, end_date: NaiveDate) -> Result<Sprint> {
        self.create_sprint_at(name, start_date, end_date, Utc::now())
    }

    /// Creates a sprint whose id derives from `created_at`.
    ///
    /// Reading the roster and writing the sprint are two separate store
    /// operations; a roster edit landing in between may or may not be seen.
    pub fn create_sprint_at(
        &mut self,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Sprint> {
        let name = require_text("name", name)?;
        if start_date > end_date {
            return Err(PlannerError::validation(format!(
                "endDate {end_date} is before startDate {start_date}"
            )));
        }

        let total_working_days = working_days(start_date, end_date);
        let roster = self.load_roster()?;
        let sprint = Sprint {
            sprint_id: self.unused_sprint_id(created_at)?,
            name,
            start_date,
            end_date,
            total_working_days,
            team_snapshot: build_team_snapshot(&roster, total_working_days),
        };
        self.save_sprint(&sprint)?;

        info!(
            sprint_id = %sprint.sprint_id,
            total_working_days,
            members = sprint.team_snapshot.len(),
            "created sprint"
        );
        Ok(sprint)
    }

    fn unused_sprint_id(&self, created_at: DateTime<Utc>) -> Result<SprintId> {
        let base = base_sprint_id(created_at);
        let mut candidate = base.clone();
        let mut suffix = 2;
        loop {
            match self.store().read_record(&candidate) {
                Ok(_) => {
                    candidate = format!("{base}-{suffix}");
                    suffix += 1;
                }
                Err(e) if e.is_not_found() => return Ok(candidate),
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn get_sprint(&self, sprint_id: &str) -> Result<Sprint> {
        self.load_sprint(sprint_id)
    }

    /// All sprints, newest start date first. Fails on the first unreadable record.
    pub fn list_sprints(&self) -> Result<Vec<Sprint>> {
        let mut sprints: Vec<Sprint> = Vec::new();
        for key in self.sprint_keys()? {
            sprints.push(store::load(self.store(), &key)?);
        }
        sort_newest_first(&mut sprints);
        Ok(sprints)
    }

    /// Like [`list_sprints`](Self::list_sprints) but skips records that
    /// cannot be read or decoded, logging each one.
    pub fn list_readable_sprints(&self) -> Result<Vec<Sprint>> {
        let mut sprints = Vec::new();
        for key in self.sprint_keys()? {
            match store::load::<Sprint>(self.store(), &key) {
                Ok(sprint) => sprints.push(sprint),
                Err(e) => warn!(key = %key, error = %e, "skipping unreadable sprint record"),
            }
        }
        sort_newest_first(&mut sprints);
        Ok(sprints)
    }

    pub fn current_sprint(&self, today: NaiveDate) -> Result<Option<Sprint>> {
        Ok(self
            .list_sprints()?
            .into_iter()
            .find(|sprint| sprint.contains_date(today)))
    }

    fn sprint_keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store()
            .list_keys(SPRINT_KEY_PREFIX)?
            .into_iter()
            .filter(|key| is_sprint_key(key))
            .collect())
    }
}
