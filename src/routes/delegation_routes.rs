// src/routes/delegation_routes.rs
use crate::models::{DelegationData, Direction, RevokeRequest, ServiceError};
use crate::services::{export, AppState};
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde::Deserialize;

#[derive(Deserialize)]
struct ListQuery {
    direction: Option<Direction>,
}

// Create a delegation. A user can delegate their own permissions; acting
// for someone else requires delegations.manage. Window overlaps with
// existing grants to the recipient come back as a warning on the
// response, never as an error.
#[post("/delegations")]
async fn create_delegation(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<DelegationData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let data = data.into_inner();

    if data.from_user_id != user_id {
        let today = Utc::now().date_naive();
        if !state
            .resolver
            .has_permission(&user_id, "delegations.manage", today)?
        {
            return Err(ServiceError::Forbidden);
        }
    }

    info!(
        "Creating delegation {} -> {} by {}",
        data.from_user_id, data.to_user_id, user_id
    );
    let outcome = state.delegations.create(data, &user_id)?;

    Ok(HttpResponse::Ok().json(outcome))
}

// List delegations involving the current user
#[get("/delegations")]
async fn list_delegations(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let direction = query.direction.unwrap_or(Direction::Both);

    let delegations = state.delegations.list_for_user(&user_id, direction)?;

    Ok(HttpResponse::Ok().json(delegations))
}

// Delegations involving the current user that are active in storage and
// whose window covers today
#[get("/delegations/active")]
async fn list_active_delegations(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let today = Utc::now().date_naive();

    let delegations = state.delegations.list_active_now(&user_id, today)?;

    Ok(HttpResponse::Ok().json(delegations))
}

// Approve a delegation (idempotent)
#[post("/delegations/{id}/approve")]
async fn approve_delegation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let delegation = state.delegations.approve(&path.into_inner(), &user_id)?;

    Ok(HttpResponse::Ok().json(delegation))
}

// Revoke a delegation (terminal; repeat calls are safe no-ops)
#[post("/delegations/{id}/revoke")]
async fn revoke_delegation(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<RevokeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let delegation =
        state
            .delegations
            .revoke(&path.into_inner(), &user_id, body.into_inner().reason)?;

    Ok(HttpResponse::Ok().json(delegation))
}

// Flat CSV snapshot of all delegations with their derived status
#[get("/delegations/export/csv")]
async fn export_delegations_csv(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let delegations = state.delegations.list_all()?;
    let today = Utc::now().date_naive();

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .append_header((
            "Content-Disposition",
            "attachment; filename=\"delegations.csv\"",
        ))
        .body(export::delegations_to_csv(&delegations, today)))
}

// Structured snapshot of all delegations
#[get("/delegations/export/json")]
async fn export_delegations_json(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let delegations = state.delegations.list_all()?;

    Ok(HttpResponse::Ok().json(delegations))
}

// Register all delegation routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_delegation)
        .service(list_active_delegations)
        .service(export_delegations_csv)
        .service(export_delegations_json)
        .service(list_delegations)
        .service(approve_delegation)
        .service(revoke_delegation);
}
