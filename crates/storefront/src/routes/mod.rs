//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /catalog                 - Filtered/sorted catalog + best-deal signal
//! GET  /catalog/{slug}          - Deep link by service or category slug
//!
//! # Bundle
//! POST /bundle/quote            - Price a session-local bundle
//!
//! # Orders
//! POST /orders                  - Build the outbound order message link
//! GET  /orders/last             - Last placed order, if any
//! GET  /help/link               - "Need help" message link
//!
//! # Preferences
//! GET  /prefs/theme             - Theme flag
//! PUT  /prefs/theme             - Set theme flag
//! GET  /prefs/plan-type         - Preferred plan type
//! PUT  /prefs/plan-type         - Set/clear preferred plan type
//! GET  /prefs/favorites         - Favorite service ids
//! POST /prefs/favorites/{id}    - Toggle a favorite
//! ```

pub mod bundle;
pub mod catalog;
pub mod orders;
pub mod prefs;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the preference routes router.
pub fn pref_routes() -> Router<AppState> {
    Router::new()
        .route("/theme", get(prefs::theme).put(prefs::set_theme))
        .route(
            "/plan-type",
            get(prefs::plan_type).put(prefs::set_plan_type),
        )
        .route("/favorites", get(prefs::favorites))
        .route("/favorites/{id}", post(prefs::toggle_favorite))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/catalog", get(catalog::index))
        .route("/catalog/{slug}", get(catalog::show))
        .route("/bundle/quote", post(bundle::quote))
        .route("/orders", post(orders::place))
        .route("/orders/last", get(orders::last))
        .route("/help/link", get(orders::help_link))
        .nest("/prefs", pref_routes())
}
