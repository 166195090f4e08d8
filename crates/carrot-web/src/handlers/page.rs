use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use carrot_core::Tab;
use carrot_dashboard::DownloadForm;
use serde::Deserialize;

use crate::handlers::render_page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub table: String,
}

pub async fn index(State(state): State<AppState>) -> Response {
    render_page(&state, None, DownloadForm::default()).await
}

/// Switch the server-wide active tab. Every open page follows on its next
/// reload.
pub async fn switch_tab(State(state): State<AppState>, Path(tab): Path<String>) -> Response {
    let tab: Tab = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };

    state.dashboard.set_active_tab(tab).await;

    // Switching back to the audit tab shows fresh reference data.
    if tab == Tab::Audit {
        let _ = state.dashboard.load_reference_data().await;
    }

    Redirect::to("/").into_response()
}

/// Download dialog preset to the table picked on the audit tab.
pub async fn open_download(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    render_page(&state, None, DownloadForm::quick(query.table)).await
}
