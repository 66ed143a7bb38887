// src/routes/team_routes.rs
use crate::models::{ServiceError, TeamData, TeamPatch};
use crate::services::{export, AppState};
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;

// Team update/delete is open to the team leader or anyone holding
// teams.manage, including through a currently-active delegation.
fn can_manage_team(
    state: &AppState,
    user_id: &str,
    leader_id: &str,
) -> Result<bool, ServiceError> {
    if user_id == leader_id {
        return Ok(true);
    }
    state
        .resolver
        .has_permission(user_id, "teams.manage", Utc::now().date_naive())
}

// Create a new team
#[post("/teams")]
async fn create_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    data: web::Json<TeamData>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("Creating new team '{}' for user: {}", data.name, user_id);
    let team = state.directory.create_team(data.into_inner(), &user_id)?;

    Ok(HttpResponse::Ok().json(team))
}

// Get all teams for the current user
#[get("/teams")]
async fn get_user_teams(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let teams = state.directory.get_user_teams(&user_id)?;
    info!("Found {} team(s) for user: {}", teams.len(), user_id);

    Ok(HttpResponse::Ok().json(teams))
}

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let team = state.directory.get_team(&path.into_inner())?;

    Ok(HttpResponse::Ok().json(team))
}

// Update a team
#[put("/teams/{team_id}")]
async fn update_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
    patch: web::Json<TeamPatch>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = state.directory.get_team(&team_id)?;
    if !can_manage_team(&state, &user_id, &team.leader_id)? {
        return Err(ServiceError::Forbidden);
    }

    let team = state
        .directory
        .update_team(&team_id, patch.into_inner(), &user_id)?;

    Ok(HttpResponse::Ok().json(team))
}

// Soft-delete a team (cascades into active delegations)
#[delete("/teams/{team_id}")]
async fn delete_team(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = state.directory.get_team(&team_id)?;
    if !can_manage_team(&state, &user_id, &team.leader_id)? {
        return Err(ServiceError::Forbidden);
    }

    let team = state.directory.delete_team(&team_id, &user_id)?;

    Ok(HttpResponse::Ok().json(team))
}

// Flat CSV snapshot of all non-deleted teams
#[get("/teams/export/csv")]
async fn export_teams_csv(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let teams = state.directory.list_teams()?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .append_header(("Content-Disposition", "attachment; filename=\"teams.csv\""))
        .body(export::teams_to_csv(&teams)))
}

// Structured snapshot of all non-deleted teams
#[get("/teams/export/json")]
async fn export_teams_json(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let teams = state.directory.list_teams()?;

    Ok(HttpResponse::Ok().json(teams))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(get_user_teams)
        .service(export_teams_csv)
        .service(export_teams_json)
        .service(get_team)
        .service(update_team)
        .service(delete_team);
}
