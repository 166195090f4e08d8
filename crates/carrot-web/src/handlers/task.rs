use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use carrot_dashboard::DownloadForm;

use crate::handlers::alert_page;
use crate::state::AppState;

/// Stop a running task
pub async fn stop_task(State(state): State<AppState>, Path(task_id): Path<String>) -> Response {
    match state.dashboard.stop_task(&task_id).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => alert_page(&state, e, DownloadForm::default()).await,
    }
}
