use carrot_dashboard::{Dashboard, HtmlRenderer};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    pub renderer: Arc<HtmlRenderer>,
    pub poll_interval_secs: u64,
}
