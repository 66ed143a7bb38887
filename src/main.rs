//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clinica_service::routes::{auth_routes, delegation_routes, stats_routes, team_routes};
use clinica_service::services::AppState;
use clinica_service::utils::Auth;
use log::info;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "9090".to_string());
    let address = format!("{}:{}", host, port);

    std::fs::create_dir_all(clinica_service::utils::store::storage_dir())?;

    let state = AppState::file_backed();

    info!("Server started at {}", address);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Cors::permissive())
            .configure(auth_routes::init_routes)
            .service(
                web::scope("")
                    .wrap(Auth)
                    .configure(auth_routes::init_protected_routes)
                    .configure(team_routes::init_routes)
                    .configure(delegation_routes::init_routes)
                    .configure(stats_routes::init_routes),
            )
    })
    .bind(address)?
    .run()
    .await
}
