use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use crate::handlers::render_error;
use crate::state::AppState;

/// Audit table only, for in-place refresh by the page script.
pub async fn audit(State(state): State<AppState>) -> Response {
    let page = state.dashboard.page().await;
    match state.renderer.render_audit(&page.audit) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

pub async fn tasks(State(state): State<AppState>) -> Response {
    let page = state.dashboard.page().await;
    match state.renderer.render_tasks(&page.tasks) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}
