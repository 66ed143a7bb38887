// src/services/stats.rs
//
// Read-side dashboard counters over the directory and delegation stores.
// No side effects; safe to call at any frequency; all zero on empty
// stores.
use crate::models::{Delegation, DelegationStatus, ServiceError, Team};
use crate::utils::store::Collection;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub total_teams: usize,
    pub total_members: usize,
    pub active_delegations: usize,
    pub pending_approvals: usize,
    pub teams_by_department: HashMap<String, usize>,
}

#[derive(Clone)]
pub struct StatisticsAggregator {
    teams: Arc<dyn Collection<Team>>,
    delegations: Arc<dyn Collection<Delegation>>,
}

impl StatisticsAggregator {
    pub fn new(
        teams: Arc<dyn Collection<Team>>,
        delegations: Arc<dyn Collection<Delegation>>,
    ) -> Self {
        Self { teams, delegations }
    }

    pub fn snapshot(&self, today: NaiveDate) -> Result<Statistics, ServiceError> {
        let mut stats = Statistics::default();

        // Distinct members across active, non-deleted teams.
        let mut member_union: HashSet<String> = HashSet::new();
        for team in self.teams.list()? {
            if team.is_deleted || !team.is_active {
                continue;
            }
            stats.total_teams += 1;
            member_union.extend(team.members.iter().cloned());
            let department = team
                .department
                .clone()
                .unwrap_or_else(|| "unassigned".to_string());
            *stats.teams_by_department.entry(department).or_insert(0) += 1;
        }
        stats.total_members = member_union.len();

        for delegation in self.delegations.list()? {
            match delegation.status_on(today) {
                DelegationStatus::Active => stats.active_delegations += 1,
                DelegationStatus::PendingApproval => stats.pending_approvals += 1,
                _ => {}
            }
        }

        Ok(stats)
    }
}
