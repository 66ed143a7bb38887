// src/tests/route_tests.rs
use crate::routes::{auth_routes, delegation_routes, stats_routes, team_routes};
use crate::services::AppState;
use crate::utils::Auth;
use actix_web::{test, web, App};
use serde_json::json;

fn test_app_state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory())
}

macro_rules! build_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(auth_routes::init_routes)
                .service(
                    web::scope("")
                        .wrap(Auth)
                        .configure(auth_routes::init_protected_routes)
                        .configure(team_routes::init_routes)
                        .configure(delegation_routes::init_routes)
                        .configure(stats_routes::init_routes),
                ),
        )
    };
}

macro_rules! register_and_login {
    ($app:expr, $email:expr, $role:expr) => {{
        let request = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(json!({
                "email": $email,
                "password": "correct-horse-battery",
                "role": $role,
                "department": "medicine"
            }))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&$app, request).await;
        let user_id = response["user_id"].as_str().unwrap().to_string();

        let request = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(json!({
                "email": $email,
                "password": "correct-horse-battery"
            }))
            .to_request();
        let response: serde_json::Value = test::call_and_read_body_json(&$app, request).await;
        let token = response["token"].as_str().unwrap().to_string();

        (user_id, token)
    }};
}

#[actix_rt::test]
async fn requests_without_a_token_are_rejected() {
    let state = test_app_state();
    let app = build_app!(state).await;

    // The middleware rejects before routing, so the error may surface
    // either as an error response or as a service error.
    let request = test::TestRequest::get().uri("/teams").to_request();
    match test::try_call_service(&app, request).await {
        Ok(response) => assert_eq!(response.status(), 401),
        Err(err) => assert_eq!(err.error_response().status(), 401),
    }
}

#[actix_rt::test]
async fn team_flow_over_http() {
    let state = test_app_state();
    let app = build_app!(state).await;

    let (user_id, token) = register_and_login!(app, "lead@clinic.test", "doctor");

    let request = test::TestRequest::post()
        .uri("/teams")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({
            "name": "Cardiology",
            "leader_id": user_id,
            "department": "medicine"
        }))
        .to_request();
    let team: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(team["name"], "Cardiology");
    assert!(team["members"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m == &json!(user_id)));

    let request = test::TestRequest::get()
        .uri("/teams")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let teams: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(teams.as_array().unwrap().len(), 1);

    let request = test::TestRequest::get()
        .uri("/stats")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let stats: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(stats["total_teams"], 1);
    assert_eq!(stats["total_members"], 1);
}

#[actix_rt::test]
async fn delegation_flow_over_http() {
    let state = test_app_state();
    let app = build_app!(state).await;

    let (doctor_id, doctor_token) = register_and_login!(app, "dr@clinic.test", "doctor");
    let (nurse_id, _nurse_token) = register_and_login!(app, "rn@clinic.test", "nurse");
    let (_admin_id, admin_token) =
        register_and_login!(app, "admin@clinic.test", "administrator");

    let request = test::TestRequest::post()
        .uri("/delegations")
        .insert_header(("Authorization", format!("Bearer {}", doctor_token)))
        .set_json(json!({
            "from_user_id": doctor_id,
            "to_user_id": nurse_id,
            "permissions": ["appointments.update"],
            "reason": "annual leave cover",
            "start_date": "2025-10-01",
            "end_date": "2025-10-15"
        }))
        .to_request();
    let outcome: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let delegation_id = outcome["delegation"]["id"].as_str().unwrap().to_string();
    assert!(outcome["conflict"].is_null());

    let request = test::TestRequest::post()
        .uri(&format!("/delegations/{}/approve", delegation_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let approved: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert!(!approved["approved_by"].is_null());

    let request = test::TestRequest::get()
        .uri(&format!("/users/{}/effective-permissions", nurse_id))
        .insert_header(("Authorization", format!("Bearer {}", admin_token)))
        .to_request();
    let resolved: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    let permissions = resolved["permissions"].as_array().unwrap();
    // Only meaningful while the window covers today; the window above is
    // fixed, so just check the endpoint shape and role permissions.
    assert!(permissions.iter().any(|p| p == &json!("patients.read")));

    let request = test::TestRequest::post()
        .uri(&format!("/delegations/{}/revoke", delegation_id))
        .insert_header(("Authorization", format!("Bearer {}", doctor_token)))
        .set_json(json!({ "reason": "cover ended early" }))
        .to_request();
    let revoked: serde_json::Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(revoked["is_active"], json!(false));
    assert_eq!(revoked["revocation_reason"], json!("cover ended early"));

    // A nurse cannot create a delegation on the doctor's behalf.
    let request = test::TestRequest::post()
        .uri("/delegations")
        .insert_header(("Authorization", format!("Bearer {}", _nurse_token)))
        .set_json(json!({
            "from_user_id": doctor_id,
            "to_user_id": nurse_id,
            "permissions": ["appointments.update"],
            "start_date": "2025-11-01",
            "end_date": "2025-11-15"
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 403);
}
