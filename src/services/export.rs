// src/services/export.rs
//
// Flat snapshots of teams and delegations for offline download. Field
// order and date formatting here are a presentation concern; the stored
// records are the contract.
use crate::models::{Delegation, Team};
use chrono::NaiveDate;

fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn joined(set: &std::collections::HashSet<String>) -> String {
    let mut items: Vec<&str> = set.iter().map(String::as_str).collect();
    items.sort_unstable();
    items.join("; ")
}

pub fn teams_to_csv(teams: &[Team]) -> String {
    let mut out = String::from(
        "id,name,department,leader_id,members,specialties,permissions,active,created_at\n",
    );
    for team in teams {
        out.push_str(&csv_row(&[
            team.id.clone(),
            team.name.clone(),
            team.department.clone().unwrap_or_default(),
            team.leader_id.clone(),
            joined(&team.members),
            joined(&team.specialties),
            joined(&team.permissions),
            team.is_active.to_string(),
            team.created_at.format("%Y-%m-%d %H:%M").to_string(),
        ]));
        out.push('\n');
    }
    out
}

pub fn delegations_to_csv(delegations: &[Delegation], today: NaiveDate) -> String {
    let mut out = String::from(
        "id,from_user_id,to_user_id,permissions,start_date,end_date,status,approved_by,revocation_reason\n",
    );
    for delegation in delegations {
        out.push_str(&csv_row(&[
            delegation.id.clone(),
            delegation.from_user_id.clone(),
            delegation.to_user_id.clone(),
            joined(&delegation.permissions),
            delegation.start_date.format("%Y-%m-%d").to_string(),
            delegation.end_date.format("%Y-%m-%d").to_string(),
            delegation.status_on(today).as_str().to_string(),
            delegation.approved_by.clone().unwrap_or_default(),
            delegation.revocation_reason.clone().unwrap_or_default(),
        ]));
        out.push('\n');
    }
    out
}
