use carrot_core::Tab;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::Dashboard;

/// Periodic refresh driver.
///
/// Each tick spawns its fetches instead of awaiting them, so a slow backend
/// can leave several refreshes in flight; the controller's request sequence
/// decides which one gets rendered.
pub struct Poller {
    dashboard: Dashboard,
    period: Duration,
}

impl Poller {
    pub fn new(dashboard: Dashboard, period: Duration) -> Self {
        Self { dashboard, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Initial load, then tick until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        tracing::info!("Starting dashboard poller (every {:?})", self.period);

        // Failures are logged by the controller; polling continues regardless.
        let _ = self.dashboard.load_reference_data().await;

        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Dashboard poller stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Run for the lifetime of the process.
    pub async fn run(self) {
        self.run_until(std::future::pending()).await
    }

    /// Spawn one round of refreshes and return their handles.
    ///
    /// Tasks are always refreshed; reference data only while the audit tab
    /// is showing.
    pub async fn tick(&self) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(2);
        let active_tab = self.dashboard.active_tab().await;

        tracing::debug!("Poll tick (active tab: {})", active_tab);

        let dashboard = self.dashboard.clone();
        handles.push(tokio::spawn(async move {
            let _ = dashboard.refresh_tasks().await;
        }));

        if active_tab == Tab::Audit {
            let dashboard = self.dashboard.clone();
            handles.push(tokio::spawn(async move {
                let _ = dashboard.load_reference_data().await;
            }));
        }

        handles
    }
}
