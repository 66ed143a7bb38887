// src/models/delegation.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// Notification intent flags. Only the intent is stored here; delivery is
// handled by an external collaborator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NotificationPrefs {
    pub start_notification: bool,
    pub end_notification: bool,
    pub daily_reminder: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            start_notification: true,
            end_notification: true,
            daily_reminder: false,
        }
    }
}

// Derived temporal status of a delegation. Never persisted: it is a pure
// function of the stored fields and the current date, recomputed on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationStatus {
    Inactive,
    PendingApproval,
    Pending,
    Expired,
    Active,
}

impl DelegationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DelegationStatus::Inactive => "inactive",
            DelegationStatus::PendingApproval => "pending_approval",
            DelegationStatus::Pending => "pending",
            DelegationStatus::Expired => "expired",
            DelegationStatus::Active => "active",
        }
    }
}

// A time-bounded grant of a subset of one user's permissions to another.
// `is_active` is a storage flag: it only flips to false through explicit
// revocation or a cascading team delete. Expiry is never written back.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Delegation {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub permissions: HashSet<String>,
    #[serde(default)]
    pub reason: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub team_id: Option<String>,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub revoked_by: Option<String>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub revocation_reason: Option<String>,
    #[serde(default)]
    pub notifications: NotificationPrefs,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl Delegation {
    // Status table, evaluated in order. Only `Active` contributes to
    // effective permissions.
    pub fn status_on(&self, today: NaiveDate) -> DelegationStatus {
        if !self.is_active {
            DelegationStatus::Inactive
        } else if self.approved_by.is_none() {
            DelegationStatus::PendingApproval
        } else if today < self.start_date {
            DelegationStatus::Pending
        } else if today > self.end_date {
            DelegationStatus::Expired
        } else {
            DelegationStatus::Active
        }
    }

    // Both window bounds are inclusive: a delegation ending on day D and
    // one starting on day D share that whole day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end_date && end >= self.start_date
    }
}

// Request body for creating a delegation.
#[derive(Serialize, Deserialize, Debug)]
pub struct DelegationData {
    pub from_user_id: String,
    pub to_user_id: String,
    pub permissions: HashSet<String>,
    pub reason: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub team_id: Option<String>,
    pub notifications: Option<NotificationPrefs>,
}

// A window collision with an existing grant to the same recipient.
// Advisory only: creation is never blocked by a conflict.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConflictWarning {
    pub delegation_id: String,
    pub from_user_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Result of a successful create: the stored record plus an optional
// overlap warning for the UI to surface.
#[derive(Serialize, Deserialize, Debug)]
pub struct DelegationOutcome {
    pub delegation: Delegation,
    pub conflict: Option<ConflictWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    From,
    To,
    Both,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RevokeRequest {
    pub reason: Option<String>,
}
