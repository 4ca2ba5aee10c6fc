//! Route configuration.

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{mutation, query, unsupported_method};
use super::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/trpc/:procedure",
            get(query).post(mutation).fallback(unsupported_method),
        )
        // The dashboard is served from another origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
