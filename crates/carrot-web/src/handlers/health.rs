use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend = match state.dashboard.api().health().await {
        Ok(health) => health.status,
        Err(e) => {
            tracing::warn!("Backend health check failed: {}", e);
            "unreachable".to_string()
        }
    };

    Json(json!({
        "status": "healthy",
        "service": "carrot-web",
        "backend": backend
    }))
}
