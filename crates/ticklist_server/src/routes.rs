//! Route table for the task API.
//!
//! # Responsibility
//! - Bind the wire paths to their handlers.
//! - Apply the permissive CORS layer for browser clients.

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// Builds the application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::update_task).delete(handlers::delete_task),
        )
        .with_state(state)
        .layer(cors)
}
