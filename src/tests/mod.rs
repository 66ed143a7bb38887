// src/tests/mod.rs
mod conflict_tests;
mod export_tests;
mod route_tests;

use crate::models::{DelegationData, TeamData, User};
use crate::services::AppState;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use uuid::Uuid;

pub fn test_state() -> AppState {
    AppState::in_memory()
}

pub fn seed_user(state: &AppState, role: &str) -> User {
    let id = Uuid::new_v4().to_string();
    let user = User {
        id: id.clone(),
        email: format!("{}@clinic.test", id),
        password_hash: "not-a-real-hash".to_string(),
        role: role.to_string(),
        department: None,
        is_active: true,
        is_deleted: false,
        created_at: Utc::now(),
    };
    state.directory.add_user(user).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn team_data(name: &str, leader_id: &str) -> TeamData {
    TeamData {
        name: name.to_string(),
        description: None,
        department: None,
        leader_id: leader_id.to_string(),
        members: None,
        specialties: None,
        schedule: None,
        permissions: None,
    }
}

pub fn delegation_data(
    from: &str,
    to: &str,
    permissions: &[&str],
    start: NaiveDate,
    end: NaiveDate,
) -> DelegationData {
    DelegationData {
        from_user_id: from.to_string(),
        to_user_id: to.to_string(),
        permissions: permissions
            .iter()
            .map(|p| p.to_string())
            .collect::<HashSet<_>>(),
        reason: Some("coverage during leave".to_string()),
        start_date: start,
        end_date: end,
        team_id: None,
        notifications: None,
    }
}
