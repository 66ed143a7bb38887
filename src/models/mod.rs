// src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

pub mod delegation;
pub mod team;
pub mod user;

pub use delegation::*;
pub use team::*;
pub use user::*;

// Custom error types for the service layer. Every validation failure is
// raised synchronously from the mutating call that detects it, before any
// write happens.
#[derive(Debug)]
pub enum ServiceError {
    InternalServerError,
    Validation(String),
    DuplicateName(String),
    NotFound,
    UserNotFound(String),
    SelfDelegation,
    InvalidWindow,
    PermissionNotHeld(String),
    Unauthorized,
    Forbidden,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
            ServiceError::Validation(msg) => write!(f, "Validation: {}", msg),
            ServiceError::DuplicateName(name) => {
                write!(f, "A team named '{}' already exists", name)
            }
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::UserNotFound(id) => write!(f, "User not found: {}", id),
            ServiceError::SelfDelegation => write!(f, "Cannot delegate permissions to yourself"),
            ServiceError::InvalidWindow => write!(f, "Start date must be before end date"),
            ServiceError::PermissionNotHeld(perm) => {
                write!(f, "Delegator does not hold permission '{}'", perm)
            }
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::Forbidden => write!(f, "Forbidden"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().json(json!({ "error": "internal_error" }))
            }
            ServiceError::Validation(ref msg) => HttpResponse::BadRequest()
                .json(json!({ "error": "validation", "message": msg })),
            ServiceError::DuplicateName(ref name) => HttpResponse::Conflict().json(json!({
                "error": "duplicate_name",
                "message": format!("A team named '{}' already exists", name)
            })),
            ServiceError::NotFound => {
                HttpResponse::NotFound().json(json!({ "error": "not_found" }))
            }
            ServiceError::UserNotFound(ref id) => HttpResponse::NotFound().json(json!({
                "error": "user_not_found",
                "message": format!("User not found: {}", id)
            })),
            ServiceError::SelfDelegation => HttpResponse::BadRequest().json(json!({
                "error": "self_delegation",
                "message": "Cannot delegate permissions to yourself"
            })),
            ServiceError::InvalidWindow => HttpResponse::BadRequest().json(json!({
                "error": "invalid_window",
                "message": "Start date must be before end date"
            })),
            ServiceError::PermissionNotHeld(ref perm) => HttpResponse::Forbidden().json(json!({
                "error": "permission_not_held",
                "message": format!("Delegator does not hold permission '{}'", perm)
            })),
            ServiceError::Unauthorized => {
                HttpResponse::Unauthorized().json(json!({ "error": "unauthorized" }))
            }
            ServiceError::Forbidden => {
                HttpResponse::Forbidden().json(json!({ "error": "forbidden" }))
            }
        }
    }
}
