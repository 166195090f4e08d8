use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use carrot_dashboard::DownloadForm;
use serde::Deserialize;

use crate::handlers::alert_page;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuickDownload {
    pub table_name: String,
    #[serde(default)]
    pub months: String,
}

#[derive(Debug, Deserialize)]
pub struct AdvancedDownload {
    pub table_name: String,
    #[serde(default)]
    pub symbols: String,
    #[serde(default)]
    pub months: String,
}

/// Quick path from the download dialog.
pub async fn quick(State(state): State<AppState>, Form(form): Form<QuickDownload>) -> Response {
    match state
        .dashboard
        .quick_download(&form.table_name, &form.months)
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            let retained = DownloadForm {
                open: true,
                table_name: form.table_name,
                months: form.months,
                ..DownloadForm::default()
            };
            alert_page(&state, e, retained).await
        }
    }
}

pub async fn advanced(
    State(state): State<AppState>,
    Form(form): Form<AdvancedDownload>,
) -> Response {
    match state
        .dashboard
        .advanced_download(&form.table_name, &form.symbols, &form.months)
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            let retained = DownloadForm {
                advanced: true,
                table_name: form.table_name,
                symbols: form.symbols,
                months: form.months,
                ..DownloadForm::default()
            };
            alert_page(&state, e, retained).await
        }
    }
}
