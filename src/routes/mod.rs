// src/routes/mod.rs
pub mod auth_routes;
pub mod delegation_routes;
pub mod stats_routes;
pub mod team_routes;
