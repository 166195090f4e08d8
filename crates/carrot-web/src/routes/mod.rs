use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Page and tabs
        .route("/", get(handlers::page::index))
        .route("/tabs/:tab", get(handlers::page::switch_tab))
        .route("/download", get(handlers::page::open_download))

        // Partial refresh
        .route("/fragments/audit", get(handlers::fragments::audit))
        .route("/fragments/tasks", get(handlers::fragments::tasks))

        // Task actions
        .route("/downloads/quick", post(handlers::download::quick))
        .route("/downloads", post(handlers::download::advanced))
        .route("/tasks/:task_id/stop", post(handlers::task::stop_task))

        // Add state
        .with_state(state)

        // Request logging
        .layer(TraceLayer::new_for_http())
}
