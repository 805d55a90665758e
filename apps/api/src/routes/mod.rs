pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs", get(handlers::handle_job_options))
        .route("/api/v1/categories", get(handlers::handle_categories))
        .route("/api/v1/keywords", get(handlers::handle_keywords))
        .route("/api/v1/match", post(handlers::handle_match))
        .with_state(state)
}
