// src/services/catalog.rs
//
// Read-only role -> permission catalog. This module is consumed by the
// delegation engine and never mutated by it; the table below stands in for
// the product-wide catalog the rest of the clinic suite maintains.
use crate::models::User;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PermissionInfo {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoleInfo {
    pub id: String,
}

const PERMISSIONS: &[(&str, &str)] = &[
    ("patients.read", "View patients"),
    ("patients.create", "Register patients"),
    ("patients.update", "Edit patient details"),
    ("patients.delete", "Archive patients"),
    ("appointments.read", "View appointments"),
    ("appointments.create", "Book appointments"),
    ("appointments.update", "Reschedule appointments"),
    ("appointments.delete", "Cancel appointments"),
    ("records.read", "View medical records"),
    ("records.create", "Write medical records"),
    ("records.update", "Amend medical records"),
    ("billing.read", "View invoices"),
    ("billing.create", "Issue invoices"),
    ("billing.update", "Adjust invoices"),
    ("catalog.read", "View service catalog"),
    ("catalog.update", "Edit service catalog"),
    ("teams.manage", "Manage teams"),
    ("delegations.manage", "Manage delegations"),
];

lazy_static! {
    static ref ROLE_PERMISSIONS: HashMap<&'static str, Vec<&'static str>> = {
        let mut roles = HashMap::new();
        roles.insert(
            "administrator",
            PERMISSIONS.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        );
        roles.insert(
            "doctor",
            vec![
                "patients.read",
                "patients.update",
                "appointments.read",
                "appointments.update",
                "records.read",
                "records.create",
                "records.update",
                "catalog.read",
            ],
        );
        roles.insert(
            "nurse",
            vec![
                "patients.read",
                "appointments.read",
                "records.read",
                "catalog.read",
            ],
        );
        roles.insert(
            "receptionist",
            vec![
                "patients.read",
                "patients.create",
                "appointments.read",
                "appointments.create",
                "appointments.update",
                "appointments.delete",
                "catalog.read",
            ],
        );
        roles.insert(
            "billing_clerk",
            vec!["patients.read", "billing.read", "billing.create", "billing.update"],
        );
        roles
    };
}

// Default permission set granted by a role. Unknown roles hold nothing.
pub fn role_permissions(role: &str) -> HashSet<String> {
    ROLE_PERMISSIONS
        .get(role)
        .map(|perms| perms.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

pub fn user_permissions(user: &User) -> HashSet<String> {
    role_permissions(&user.role)
}

pub fn all_permissions() -> Vec<PermissionInfo> {
    PERMISSIONS
        .iter()
        .map(|(id, name)| PermissionInfo {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn all_roles() -> Vec<RoleInfo> {
    let mut ids: Vec<&str> = ROLE_PERMISSIONS.keys().copied().collect();
    ids.sort_unstable();
    ids.into_iter()
        .map(|id| RoleInfo { id: id.to_string() })
        .collect()
}
