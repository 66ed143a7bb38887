// src/services/delegation_manager.rs
//
// Orchestrates the delegation lifecycle: create, approve, revoke and the
// cascading deactivation triggered by a team delete. This is the only
// component that writes to the delegation store. All validation runs
// before any mutation, so a failed call leaves no partial write behind.
use crate::models::{
    Delegation, DelegationData, DelegationOutcome, Direction, ServiceError, User,
};
use crate::services::{audit, catalog, conflict::ConflictDetector};
use crate::utils::store::Collection;
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct DelegationManager {
    delegations: Arc<dyn Collection<Delegation>>,
    users: Arc<dyn Collection<User>>,
    detector: ConflictDetector,
}

impl DelegationManager {
    pub fn new(
        delegations: Arc<dyn Collection<Delegation>>,
        users: Arc<dyn Collection<User>>,
    ) -> Self {
        let detector = ConflictDetector::new(delegations.clone());
        Self {
            delegations,
            users,
            detector,
        }
    }

    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    fn available_user(&self, user_id: &str) -> Result<User, ServiceError> {
        match self.users.get(user_id)? {
            Some(user) if user.is_available() => Ok(user),
            _ => Err(ServiceError::UserNotFound(user_id.to_string())),
        }
    }

    // Validates in order: users exist and are available, no
    // self-delegation, strict window, permissions held by the delegator's
    // role. Delegated permissions are never re-delegatable: only the
    // delegator's own role permissions qualify. An overlapping grant to
    // the same recipient is returned as a warning, not an error.
    pub fn create(
        &self,
        data: DelegationData,
        actor_id: &str,
    ) -> Result<DelegationOutcome, ServiceError> {
        let from = self.available_user(&data.from_user_id)?;
        let to = self.available_user(&data.to_user_id)?;

        if from.id == to.id {
            return Err(ServiceError::SelfDelegation);
        }

        if data.start_date >= data.end_date {
            return Err(ServiceError::InvalidWindow);
        }

        if data.permissions.is_empty() {
            return Err(ServiceError::PermissionNotHeld(
                "no permissions requested".to_string(),
            ));
        }
        let held = catalog::role_permissions(&from.role);
        for permission in &data.permissions {
            if !held.contains(permission) {
                return Err(ServiceError::PermissionNotHeld(permission.clone()));
            }
        }

        let conflict =
            self.detector
                .find_conflict(&to.id, data.start_date, data.end_date, None)?;
        if let Some(ref existing) = conflict {
            warn!(
                "Delegation to {} overlaps existing grant {} ({} - {})",
                to.id, existing.delegation_id, existing.start_date, existing.end_date
            );
        }

        let delegation = Delegation {
            id: Uuid::new_v4().to_string(),
            from_user_id: from.id.clone(),
            to_user_id: to.id.clone(),
            permissions: data.permissions,
            reason: data.reason.unwrap_or_default(),
            start_date: data.start_date,
            end_date: data.end_date,
            is_active: true,
            team_id: data.team_id,
            approved_by: None,
            approved_at: None,
            revoked_by: None,
            revoked_at: None,
            revocation_reason: None,
            notifications: data.notifications.unwrap_or_default(),
            created_at: Utc::now(),
            created_by: actor_id.to_string(),
        };

        let delegation = self.delegations.put(delegation)?;
        info!(
            "Delegation created: {} ({} -> {})",
            delegation.id, delegation.from_user_id, delegation.to_user_id
        );
        audit::record(
            actor_id,
            "delegation.create",
            &delegation.id,
            json!({
                "from": delegation.from_user_id,
                "to": delegation.to_user_id,
                "start": delegation.start_date,
                "end": delegation.end_date,
            }),
        );

        Ok(DelegationOutcome {
            delegation,
            conflict,
        })
    }

    // Approval is not reversible, so a second call is a no-op that returns
    // the record unchanged and keeps the original `approved_at`.
    pub fn approve(&self, id: &str, approver_id: &str) -> Result<Delegation, ServiceError> {
        let mut delegation = self.delegations.get(id)?.ok_or(ServiceError::NotFound)?;

        if delegation.approved_by.is_some() {
            return Ok(delegation);
        }

        // Approval by one of the two parties is tolerated (no error is
        // defined for it), but it is worth a trace in the log.
        if approver_id == delegation.from_user_id || approver_id == delegation.to_user_id {
            warn!(
                "Delegation {} approved by involved party {}",
                delegation.id, approver_id
            );
        }

        delegation.approved_by = Some(approver_id.to_string());
        delegation.approved_at = Some(Utc::now());
        let delegation = self.delegations.put(delegation)?;

        info!("Delegation approved: {} by {}", delegation.id, approver_id);
        audit::record(approver_id, "delegation.approve", &delegation.id, json!({}));

        Ok(delegation)
    }

    // Revocation is terminal. Revoking an already inactive delegation is a
    // safe no-op.
    pub fn revoke(
        &self,
        id: &str,
        actor_id: &str,
        reason: Option<String>,
    ) -> Result<Delegation, ServiceError> {
        let mut delegation = self.delegations.get(id)?.ok_or(ServiceError::NotFound)?;

        if !delegation.is_active {
            return Ok(delegation);
        }

        delegation.is_active = false;
        delegation.revoked_by = Some(actor_id.to_string());
        delegation.revoked_at = Some(Utc::now());
        delegation.revocation_reason = Some(reason.unwrap_or_else(|| "revoked".to_string()));
        let delegation = self.delegations.put(delegation)?;

        info!("Delegation revoked: {} by {}", delegation.id, actor_id);
        audit::record(
            actor_id,
            "delegation.revoke",
            &delegation.id,
            json!({ "reason": delegation.revocation_reason }),
        );

        Ok(delegation)
    }

    // Invoked by the directory when a team is soft-deleted: every active
    // delegation tied to the team is deactivated in one collection write.
    pub fn cascade_deactivate_by_team(
        &self,
        team_id: &str,
        actor_id: &str,
        reason: &str,
    ) -> Result<usize, ServiceError> {
        let mut delegations = self.delegations.list()?;
        let now = Utc::now();
        let mut deactivated = 0;

        for delegation in delegations.iter_mut() {
            if delegation.team_id.as_deref() != Some(team_id) || !delegation.is_active {
                continue;
            }
            delegation.is_active = false;
            delegation.revoked_by = Some(actor_id.to_string());
            delegation.revoked_at = Some(now);
            delegation.revocation_reason = Some(reason.to_string());
            deactivated += 1;
        }

        if deactivated > 0 {
            self.delegations.replace_all(delegations)?;
            info!(
                "Deactivated {} delegation(s) for deleted team {}",
                deactivated, team_id
            );
        }

        Ok(deactivated)
    }

    pub fn get(&self, id: &str) -> Result<Delegation, ServiceError> {
        self.delegations.get(id)?.ok_or(ServiceError::NotFound)
    }

    pub fn list_all(&self) -> Result<Vec<Delegation>, ServiceError> {
        self.delegations.list()
    }

    // All delegations involving the user, regardless of temporal status.
    pub fn list_for_user(
        &self,
        user_id: &str,
        direction: Direction,
    ) -> Result<Vec<Delegation>, ServiceError> {
        Ok(self
            .delegations
            .list()?
            .into_iter()
            .filter(|d| match direction {
                Direction::From => d.from_user_id == user_id,
                Direction::To => d.to_user_id == user_id,
                Direction::Both => d.from_user_id == user_id || d.to_user_id == user_id,
            })
            .collect())
    }

    // Delegations involving the user that are active in storage and whose
    // window covers `today`. The permission resolver consumes this set and
    // applies the derived-status filter on top.
    pub fn list_active_now(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Delegation>, ServiceError> {
        Ok(self
            .delegations
            .list()?
            .into_iter()
            .filter(|d| {
                (d.from_user_id == user_id || d.to_user_id == user_id)
                    && d.is_active
                    && d.covers(today)
            })
            .collect())
    }
}
