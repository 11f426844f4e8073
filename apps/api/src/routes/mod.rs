pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/load", post(handlers::handle_load))
        // Tailoring workflow (model-backed)
        .route("/api/v1/resume/optimize", post(handlers::handle_optimize))
        .route("/api/v1/resume/adjust", post(handlers::handle_adjust))
        .route("/api/v1/resume/revert", post(handlers::handle_revert))
        .route("/api/v1/resume/convert", post(handlers::handle_convert))
        // Local utilities (no model call)
        .route("/api/v1/resume/diff", post(handlers::handle_diff))
        .route("/api/v1/resume/validate", post(handlers::handle_validate))
        .route("/api/v1/resume/export", post(handlers::handle_export_json))
        .with_state(state)
}
