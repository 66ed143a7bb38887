// src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// Opening hours for one weekday. A `None` entry in the schedule means the
// team does not work that day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

pub type WeekSchedule = BTreeMap<String, Option<TimeRange>>;

// Monday-Friday 08:00-17:00, weekend off.
pub fn default_schedule() -> WeekSchedule {
    let workday = Some(TimeRange {
        start: "08:00".to_string(),
        end: "17:00".to_string(),
    });

    let mut schedule = WeekSchedule::new();
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
        schedule.insert(day.to_string(), workday.clone());
    }
    schedule.insert("saturday".to_string(), None);
    schedule.insert("sunday".to_string(), None);
    schedule
}

// A clinic team. Invariant: `leader_id` is always present in `members`;
// the mutators in the directory service normalize this on every write.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub department: Option<String>,
    pub leader_id: String,
    pub members: HashSet<String>,
    #[serde(default)]
    pub specialties: HashSet<String>,
    pub schedule: WeekSchedule,
    #[serde(default)]
    pub permissions: HashSet<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
}

impl Team {
    pub fn involves(&self, user_id: &str) -> bool {
        self.leader_id == user_id || self.members.contains(user_id)
    }
}

// Request body for creating a team.
#[derive(Serialize, Deserialize, Debug)]
pub struct TeamData {
    pub name: String,
    pub description: Option<String>,
    pub department: Option<String>,
    pub leader_id: String,
    pub members: Option<HashSet<String>>,
    pub specialties: Option<HashSet<String>>,
    pub schedule: Option<WeekSchedule>,
    pub permissions: Option<HashSet<String>>,
}

// Partial update for a team. `id`, `created_at` and `created_by` are not
// representable here, so a patch can never overwrite them. `None` means
// "leave unchanged"; optional fields like `department` cannot be cleared
// back to empty through a patch, only replaced.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,
    pub leader_id: Option<String>,
    pub members: Option<HashSet<String>>,
    pub specialties: Option<HashSet<String>>,
    pub schedule: Option<WeekSchedule>,
    pub permissions: Option<HashSet<String>>,
    pub is_active: Option<bool>,
}
