//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                         - Health check
//! POST /login                          - Password -> bearer token
//! POST /logout                         - Revoke the presented token
//!
//! # Catalog management (bearer token required)
//! GET    /services?search=             - List services
//! POST   /services                     - Create a service with defaults
//! PATCH  /services/{id}                - Update service fields
//! DELETE /services/{id}                - Delete a service
//! POST   /services/{id}/plans          - Append a default plan
//! PATCH  /services/{id}/plans/{plan}   - Update a plan by stable id
//! DELETE /services/{id}/plans/{plan}   - Remove a plan by stable id
//! GET    /services/{id}/profit         - Profit summary for one service
//! GET    /report.csv                   - Full catalog report download
//! ```

pub mod auth;
pub mod report;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the service management routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::list).post(services::create))
        .route(
            "/{id}",
            axum::routing::patch(services::update).delete(services::delete),
        )
        .route("/{id}/plans", post(services::add_plan))
        .route(
            "/{id}/plans/{plan_id}",
            axum::routing::patch(services::update_plan).delete(services::delete_plan),
        )
        .route("/{id}/profit", get(services::profit))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .nest("/services", service_routes())
        .route("/report.csv", get(report::download))
}
