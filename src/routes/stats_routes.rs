// src/routes/stats_routes.rs
use crate::models::ServiceError;
use crate::services::{catalog, AppState};
use crate::utils::get_user_id_from_request;
use actix_web::{get, web, HttpRequest, HttpResponse};
use chrono::Utc;
use serde_json::json;

// Dashboard counters
#[get("/stats")]
async fn get_stats(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let today = Utc::now().date_naive();

    let stats = state.stats.snapshot(today)?;

    Ok(HttpResponse::Ok().json(stats))
}

// Permission catalog (read-only)
#[get("/permissions")]
async fn get_permissions(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    Ok(HttpResponse::Ok().json(catalog::all_permissions()))
}

#[get("/roles")]
async fn get_roles(req: HttpRequest) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    Ok(HttpResponse::Ok().json(catalog::all_roles()))
}

// Users eligible for team membership and delegation, for UI pickers
#[get("/users")]
async fn list_users(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let users: Vec<serde_json::Value> = state
        .directory
        .list_available_users()?
        .into_iter()
        .map(|u| {
            json!({
                "id": u.id,
                "email": u.email,
                "role": u.role,
                "department": u.department
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(users))
}

// Effective permissions of a user right now: role + team permissions plus
// currently-active delegated grants
#[get("/users/{id}/effective-permissions")]
async fn get_effective_permissions(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let target = path.into_inner();
    let today = Utc::now().date_naive();

    let mut permissions: Vec<String> = state
        .resolver
        .resolve(&target, today)?
        .into_iter()
        .collect();
    permissions.sort_unstable();

    Ok(HttpResponse::Ok().json(json!({
        "user_id": target,
        "as_of": today,
        "permissions": permissions
    })))
}

// Register all stats/catalog routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_stats)
        .service(get_permissions)
        .service(get_roles)
        .service(list_users)
        .service(get_effective_permissions);
}
