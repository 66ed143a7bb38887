// src/services/directory.rs
//
// Holds the users and teams of the clinic. Team mutators enforce the
// structural invariants themselves instead of trusting the caller: the
// leader is always folded into the member set, names stay unique
// (case-insensitively) among non-deleted teams, and a team delete cascades
// into the delegation store.
use crate::models::{default_schedule, ServiceError, Team, TeamData, TeamPatch, User};
use crate::services::{audit, delegation_manager::DelegationManager};
use crate::utils::store::Collection;
use chrono::Utc;
use log::info;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

const TEAM_DELETED_REASON: &str = "team deleted";

#[derive(Clone)]
pub struct Directory {
    teams: Arc<dyn Collection<Team>>,
    users: Arc<dyn Collection<User>>,
    delegations: DelegationManager,
}

impl Directory {
    pub fn new(
        teams: Arc<dyn Collection<Team>>,
        users: Arc<dyn Collection<User>>,
        delegations: DelegationManager,
    ) -> Self {
        Self {
            teams,
            users,
            delegations,
        }
    }

    // Case-insensitive name collision check against non-deleted teams.
    fn name_taken(&self, name: &str, exclude_id: Option<&str>) -> Result<bool, ServiceError> {
        let needle = name.trim().to_lowercase();
        Ok(self.teams.list()?.iter().any(|team| {
            !team.is_deleted
                && Some(team.id.as_str()) != exclude_id
                && team.name.trim().to_lowercase() == needle
        }))
    }

    fn resolve_leader(&self, leader_id: &str) -> Result<User, ServiceError> {
        match self.users.get(leader_id)? {
            Some(user) if !user.is_deleted => Ok(user),
            _ => Err(ServiceError::Validation(format!(
                "leader_id '{}' does not resolve to a known user",
                leader_id
            ))),
        }
    }

    pub fn create_team(&self, data: TeamData, actor_id: &str) -> Result<Team, ServiceError> {
        let name = data.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Validation("name is required".to_string()));
        }
        if data.leader_id.trim().is_empty() {
            return Err(ServiceError::Validation("leader_id is required".to_string()));
        }
        self.resolve_leader(&data.leader_id)?;

        if self.name_taken(&name, None)? {
            return Err(ServiceError::DuplicateName(name));
        }

        // The leader is always a member, whatever the caller supplied.
        let mut members = data.members.unwrap_or_default();
        members.insert(data.leader_id.clone());

        let now = Utc::now();
        let team = Team {
            id: Uuid::new_v4().to_string(),
            name,
            description: data.description.unwrap_or_default(),
            department: data.department,
            leader_id: data.leader_id,
            members,
            specialties: data.specialties.unwrap_or_default(),
            schedule: data.schedule.unwrap_or_else(default_schedule),
            permissions: data.permissions.unwrap_or_default(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            created_by: actor_id.to_string(),
            updated_at: now,
            updated_by: actor_id.to_string(),
        };

        let team = self.teams.put(team)?;
        info!("Team created: {} ({})", team.name, team.id);
        audit::record(
            actor_id,
            "team.create",
            &team.id,
            json!({ "name": team.name }),
        );

        Ok(team)
    }

    // Merges the patch over the stored record. `id`, `created_at` and
    // `created_by` are not part of the patch type, so they cannot be
    // overwritten. The leader/member invariant is re-normalized after the
    // merge, inside the same write.
    pub fn update_team(
        &self,
        id: &str,
        patch: TeamPatch,
        actor_id: &str,
    ) -> Result<Team, ServiceError> {
        let mut team = match self.teams.get(id)? {
            Some(team) if !team.is_deleted => team,
            _ => return Err(ServiceError::NotFound),
        };

        if let Some(name) = patch.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(ServiceError::Validation("name is required".to_string()));
            }
            if self.name_taken(&name, Some(id))? {
                return Err(ServiceError::DuplicateName(name));
            }
            team.name = name;
        }
        if let Some(leader_id) = patch.leader_id {
            self.resolve_leader(&leader_id)?;
            team.leader_id = leader_id;
        }
        if let Some(description) = patch.description {
            team.description = description;
        }
        if let Some(department) = patch.department {
            team.department = Some(department);
        }
        if let Some(members) = patch.members {
            team.members = members;
        }
        if let Some(specialties) = patch.specialties {
            team.specialties = specialties;
        }
        if let Some(schedule) = patch.schedule {
            team.schedule = schedule;
        }
        if let Some(permissions) = patch.permissions {
            team.permissions = permissions;
        }
        if let Some(is_active) = patch.is_active {
            team.is_active = is_active;
        }

        team.members.insert(team.leader_id.clone());
        team.updated_at = Utc::now();
        team.updated_by = actor_id.to_string();

        let team = self.teams.put(team)?;
        info!("Team updated: {} ({})", team.name, team.id);
        audit::record(actor_id, "team.update", &team.id, json!({}));

        Ok(team)
    }

    // Soft delete: the record is kept for history, and every active
    // delegation tied to the team is deactivated with reason "team
    // deleted".
    pub fn delete_team(&self, id: &str, actor_id: &str) -> Result<Team, ServiceError> {
        let mut team = match self.teams.get(id)? {
            Some(team) if !team.is_deleted => team,
            _ => return Err(ServiceError::NotFound),
        };

        team.is_deleted = true;
        team.is_active = false;
        team.updated_at = Utc::now();
        team.updated_by = actor_id.to_string();
        let team = self.teams.put(team)?;

        let cascaded =
            self.delegations
                .cascade_deactivate_by_team(&team.id, actor_id, TEAM_DELETED_REASON)?;

        info!(
            "Team deleted: {} ({}), {} delegation(s) deactivated",
            team.name, team.id, cascaded
        );
        audit::record(
            actor_id,
            "team.delete",
            &team.id,
            json!({ "cascaded_delegations": cascaded }),
        );

        Ok(team)
    }

    pub fn get_team(&self, id: &str) -> Result<Team, ServiceError> {
        match self.teams.get(id)? {
            Some(team) if !team.is_deleted => Ok(team),
            _ => Err(ServiceError::NotFound),
        }
    }

    pub fn list_teams(&self) -> Result<Vec<Team>, ServiceError> {
        Ok(self
            .teams
            .list()?
            .into_iter()
            .filter(|t| !t.is_deleted)
            .collect())
    }

    // Active, non-deleted teams the user leads or belongs to.
    pub fn get_user_teams(&self, user_id: &str) -> Result<Vec<Team>, ServiceError> {
        Ok(self
            .teams
            .list()?
            .into_iter()
            .filter(|t| !t.is_deleted && t.is_active && t.involves(user_id))
            .collect())
    }

    pub fn find_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.users.get(id)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let needle = email.to_lowercase();
        Ok(self
            .users
            .list()?
            .into_iter()
            .find(|u| !u.is_deleted && u.email.to_lowercase() == needle))
    }

    pub fn add_user(&self, user: User) -> Result<User, ServiceError> {
        self.users.put(user)
    }

    // Users eligible for team membership and delegation.
    pub fn list_available_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self
            .users
            .list()?
            .into_iter()
            .filter(|u| u.is_available())
            .collect())
    }
}
