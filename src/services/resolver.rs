// src/services/resolver.rs
//
// Effective permissions are a pure function of the stored records and the
// current date: role permissions, plus the permission sets of the user's
// active teams, plus everything granted by delegations whose derived
// status is `active` right now. The result is recomputed on every check
// and never cached, since a grant can silently expire between two checks
// without any write occurring.
use crate::models::{DelegationStatus, ServiceError, Team, User};
use crate::services::{catalog, delegation_manager::DelegationManager};
use crate::utils::store::Collection;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct EffectivePermissionResolver {
    users: Arc<dyn Collection<User>>,
    teams: Arc<dyn Collection<Team>>,
    delegations: DelegationManager,
}

impl EffectivePermissionResolver {
    pub fn new(
        users: Arc<dyn Collection<User>>,
        teams: Arc<dyn Collection<Team>>,
        delegations: DelegationManager,
    ) -> Self {
        Self {
            users,
            teams,
            delegations,
        }
    }

    // Role and team permissions, before any delegated grants.
    pub fn base_permissions(&self, user_id: &str) -> Result<HashSet<String>, ServiceError> {
        let user = match self.users.get(user_id)? {
            Some(user) if user.is_available() => user,
            _ => return Err(ServiceError::UserNotFound(user_id.to_string())),
        };

        let mut permissions = catalog::user_permissions(&user);
        for team in self.teams.list()? {
            if !team.is_deleted && team.is_active && team.involves(user_id) {
                permissions.extend(team.permissions.iter().cloned());
            }
        }

        Ok(permissions)
    }

    pub fn resolve(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<HashSet<String>, ServiceError> {
        let mut permissions = self.base_permissions(user_id)?;

        for delegation in self.delegations.list_active_now(user_id, today)? {
            if delegation.to_user_id == user_id
                && delegation.status_on(today) == DelegationStatus::Active
            {
                permissions.extend(delegation.permissions.iter().cloned());
            }
        }

        Ok(permissions)
    }

    pub fn has_permission(
        &self,
        user_id: &str,
        permission: &str,
        today: NaiveDate,
    ) -> Result<bool, ServiceError> {
        Ok(self.resolve(user_id, today)?.contains(permission))
    }
}
