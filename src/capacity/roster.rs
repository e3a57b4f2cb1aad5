use tracing::info;
use uuid::Uuid;

use super::planner::{require_text, Planner};
use super::store::DocumentStore;
use super::types::*;
use crate::error::{PlannerError, Result};

impl<S: DocumentStore> Planner<S> {
    pub fn list_members(&self) -> Result<Vec<TeamMember>> {
        self.load_roster()
    }

    pub fn get_member(&self, member_id: &str) -> Result<TeamMember> {
        self.load_roster()?
            .into_iter()
            .find(|m| m.id == member_id)
            .ok_or_else(|| PlannerError::not_found("member", member_id))
    }

    pub fn add_member(&mut self, name: &str, emoji: &str) -> Result<TeamMember> {
        let member = TeamMember {
            id: Uuid::new_v4().to_string(),
            name: require_text("name", name)?,
            emoji: require_text("emoji", emoji)?,
        };

        let mut members = self.load_roster()?;
        members.push(member.clone());
        self.save_roster(&members)?;

        info!(member_id = %member.id, name = %member.name, "added team member");
        Ok(member)
    }

    /// Renames a member or changes their emoji. Sprints created earlier keep
    /// the values they copied at creation time.
    pub fn update_member(
        &mut self,
        member_id: &str,
        name: Option<&str>,
        emoji: Option<&str>,
    ) -> Result<TeamMember> {
        if name.is_none() && emoji.is_none() {
            return Err(PlannerError::validation("name or emoji must be provided"));
        }
        let name = name.map(|n| require_text("name", n)).transpose()?;
        let emoji = emoji.map(|e| require_text("emoji", e)).transpose()?;

        let mut members = self.load_roster()?;
        let member = members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| PlannerError::not_found("member", member_id))?;
        if let Some(name) = name {
            member.name = name;
        }
        if let Some(emoji) = emoji {
            member.emoji = emoji;
        }
        let updated = member.clone();
        self.save_roster(&members)?;

        info!(member_id, "updated team member");
        Ok(updated)
    }

    pub fn remove_member(&mut self, member_id: &str) -> Result<()> {
        let mut members = self.load_roster()?;
        let initial_len = members.len();
        members.retain(|m| m.id != member_id);
        if members.len() == initial_len {
            return Err(PlannerError::not_found("member", member_id));
        }
        self.save_roster(&members)?;

        info!(member_id, "removed team member");
        Ok(())
    }
}
