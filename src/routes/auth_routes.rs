// src/routes/auth_routes.rs
use crate::models::{LoginResponse, RegisterRequest, ServiceError, User, UserCredentials};
use crate::services::{catalog, AppState};
use crate::utils::{get_user_id_from_request, is_valid_email, jwt, password};
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use uuid::Uuid;

// Register a new staff member
#[post("/auth/register")]
async fn register(
    state: web::Data<AppState>,
    data: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ServiceError> {
    info!("Register request for email: {}", data.email);

    if !is_valid_email(&data.email) {
        return Err(ServiceError::Validation("invalid email address".to_string()));
    }
    if data.password.len() < 8 {
        return Err(ServiceError::Validation(
            "password must be at least 8 characters".to_string(),
        ));
    }
    if !catalog::all_roles().iter().any(|r| r.id == data.role) {
        return Err(ServiceError::Validation(format!(
            "unknown role '{}'",
            data.role
        )));
    }

    // Check if the email already exists
    if state.directory.find_user_by_email(&data.email)?.is_some() {
        error!("Email already registered: {}", data.email);
        return Err(ServiceError::Validation(
            "Email already registered".to_string(),
        ));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: data.email.clone(),
        password_hash: password::hash_password(&data.password)?,
        role: data.role.clone(),
        department: data.department.clone(),
        is_active: true,
        is_deleted: false,
        created_at: Utc::now(),
    };

    let user = state.directory.add_user(user)?;
    info!("User registered successfully: {}", user.id);

    Ok(HttpResponse::Ok().json(json!({
        "message": "User registered successfully",
        "user_id": user.id
    })))
}

// Login and get JWT token
#[post("/auth/login")]
async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<UserCredentials>,
) -> Result<HttpResponse, ServiceError> {
    info!("Login request for email: {}", credentials.email);

    let user = match state.directory.find_user_by_email(&credentials.email)? {
        Some(user) if user.is_available() => user,
        _ => {
            error!("Unknown or unavailable user: {}", credentials.email);
            return Err(ServiceError::Unauthorized);
        }
    };

    if !password::verify_password(&credentials.password, &user.password_hash)? {
        error!("Invalid password for user: {}", credentials.email);
        return Err(ServiceError::Unauthorized);
    }

    let token = jwt::generate_token(&user)?;
    info!("User logged in successfully: {}", user.id);

    let response = LoginResponse {
        token: token.clone(),
        user_id: user.id,
        email: user.email,
        role: user.role,
    };

    Ok(HttpResponse::Ok()
        .append_header(("Authorization", format!("Bearer {}", token)))
        .json(response))
}

// Get current user info (requires authentication)
#[get("/auth/me")]
async fn me(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let user = state
        .directory
        .find_user(&user_id)?
        .ok_or(ServiceError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(json!({
        "user_id": user.id,
        "email": user.email,
        "role": user.role,
        "department": user.department,
        "created_at": user.created_at
    })))
}

// Open auth routes (no token required)
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}

// Auth routes that sit behind the Authentication middleware
pub fn init_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(me);
}
