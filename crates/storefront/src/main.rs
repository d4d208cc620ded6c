//! Cedars Subscriptions Storefront - public shopper-facing JSON API.
//!
//! This binary serves the storefront API on port 3000.
//!
//! # Architecture
//!
//! - Axum JSON API over the live catalog snapshot
//! - Catalog state subscribed from the document store (`cedars-store`)
//! - Checkout is an outbound chat message link; nothing is charged here
//! - Shopper preferences persist in a local JSON file
//!
//! The admin panel is a separate binary with its own credential; this one
//! only ever reads the catalog.

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cedars_store::StoreConfig;
use cedars_storefront::config::StorefrontConfig;
use cedars_storefront::prefs::FilePrefStore;
use cedars_storefront::state::AppState;
use cedars_storefront::{catalog_feed, routes};

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cedars_storefront=info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    let store = StoreConfig::from_env()
        .and_then(|store_config| store_config.build())
        .expect("Failed to configure document store");

    let catalog = catalog_feed::start(store.as_ref())
        .await
        .expect("Failed to subscribe to the catalog");
    tracing::info!("Catalog subscription started");

    let prefs = FilePrefStore::open(&config.prefs_path);

    let state = AppState::new(config.clone(), store, catalog, prefs);

    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
