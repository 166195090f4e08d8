pub mod download;
pub mod fragments;
pub mod health;
pub mod page;
pub mod task;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use carrot_dashboard::{DownloadForm, PageOptions};

use crate::state::AppState;

/// Full page with the current dashboard contents.
pub(crate) async fn render_page(
    state: &AppState,
    alert: Option<String>,
    form: DownloadForm,
) -> Response {
    let page = state.dashboard.page().await;
    let options = PageOptions {
        alert,
        form,
        poll_interval_secs: state.poll_interval_secs,
    };

    match state.renderer.render_page(&page, &options) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

/// Page with a blocking alert; the submitted form is shown again.
pub(crate) async fn alert_page(
    state: &AppState,
    error: carrot_dashboard::Error,
    form: DownloadForm,
) -> Response {
    let status = match &error {
        carrot_dashboard::Error::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    };

    let mut response = render_page(state, Some(error.to_string()), form).await;
    if response.status().is_success() {
        *response.status_mut() = status;
    }
    response
}

pub(crate) fn render_error(error: carrot_dashboard::Error) -> Response {
    tracing::error!("Failed to render page: {}", error);
    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
}
