//! Reference compute service for mesh alignment, deformation and cleaning.
//!
//! Every endpoint speaks the binary PLY wire format from `shared::ply`.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod compute;
mod routes;

pub use routes::MAX_MODES;

/// Largest accepted request body (scans can be large).
const MAX_BODY_BYTES: usize = 512 * 1024 * 1024;

/// Build the service router.
pub fn app() -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/register", post(routes::register))
        .route("/api/deform", post(routes::deform))
        .route("/api/clean", post(routes::clean))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}
