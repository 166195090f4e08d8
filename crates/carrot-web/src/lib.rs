pub mod handlers;
pub mod routes;
pub mod state;

use anyhow::Result;
use carrot_client::MarketClient;
use carrot_dashboard::{Dashboard, DashboardConfig, HtmlRenderer, Poller};
use std::sync::Arc;

pub use routes::create_router;
pub use state::AppState;

/// Start the poller and serve the dashboard until the process exits.
pub async fn serve(config: &DashboardConfig) -> Result<()> {
    let client = MarketClient::with_timeout(&config.api_base_url, config.request_timeout())?;
    let dashboard = Dashboard::new(Arc::new(client));

    tokio::spawn(Poller::new(dashboard.clone(), config.poll_interval()).run());

    let state = AppState {
        dashboard,
        renderer: Arc::new(HtmlRenderer::new()?),
        poll_interval_secs: config.poll_interval().as_secs(),
    };

    let app = create_router(state);

    let addr = config.bind_addr();
    tracing::info!(
        "Carrot dashboard running on http://{} (backend: {})",
        addr,
        config.api_base_url
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
