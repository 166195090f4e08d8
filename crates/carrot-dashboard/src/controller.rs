use carrot_client::MarketApi;
use carrot_core::{
    audit_rows, parse_list, task_list, AuditRow, DownloadRequest, Tab, Task, TaskList, ViewModel,
};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::{RequestSequence, Result};

/// What the surfaces display. Replaced piecewise on every render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Shared by every viewer of one controller. It also decides whether
    /// the poller reloads reference data, so a tab switch from one browser
    /// applies to all of them.
    pub active_tab: Tab,
    pub audit: Vec<AuditRow>,
    pub tasks: TaskList,
}

#[derive(Debug, Default)]
struct DashboardState {
    view: ViewModel,
    page: Page,
}

/// Dashboard controller.
///
/// Owns the reference view model and the rendered page, fetches through a
/// [`MarketApi`], and publishes a revision number every time the page
/// changes.
///
/// There is one page per controller, not one per session. The web server
/// runs a single controller, so every browser sees the same active tab.
#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn MarketApi>,
    state: Arc<RwLock<DashboardState>>,
    reference_seq: Arc<RequestSequence>,
    task_seq: Arc<RequestSequence>,
    revision: Arc<watch::Sender<u64>>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn MarketApi>) -> Self {
        let (revision, _) = watch::channel(0);

        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::default())),
            reference_seq: Arc::new(RequestSequence::new()),
            task_seq: Arc::new(RequestSequence::new()),
            revision: Arc::new(revision),
        }
    }

    pub fn api(&self) -> &Arc<dyn MarketApi> {
        &self.api
    }

    /// Receives the page revision after every render.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn page(&self) -> Page {
        self.state.read().await.page.clone()
    }

    pub async fn view(&self) -> ViewModel {
        self.state.read().await.view.clone()
    }

    pub async fn active_tab(&self) -> Tab {
        self.state.read().await.page.active_tab
    }

    pub async fn set_active_tab(&self, tab: Tab) {
        let mut state = self.state.write().await;
        if state.page.active_tab != tab {
            tracing::debug!("Switching tab: {} -> {}", state.page.active_tab, tab);
            state.page.active_tab = tab;
            drop(state);
            self.bump_revision();
        }
    }

    /// Fetch registry and metadata together and re-render the audit table,
    /// then refresh tasks.
    ///
    /// Nothing is rendered unless both requests succeed. Failures are logged
    /// and the previous view is kept.
    pub async fn load_reference_data(&self) -> Result<()> {
        let ticket = self.reference_seq.issue();

        let fetched = tokio::try_join!(self.api.registry(), self.api.metadata());
        let (registry, metadata) = match fetched {
            Ok(pair) => pair,
            Err(e) => {
                tracing::error!("Failed to load reference data: {}", e);
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.write().await;
            if !self.reference_seq.is_latest(ticket) {
                tracing::warn!(
                    "Discarding stale reference data (request #{}, latest #{})",
                    ticket.number(),
                    self.reference_seq.latest()
                );
                return Ok(());
            }

            tracing::debug!(
                "Loaded {} registered tables, {} with data",
                registry.len(),
                metadata.len()
            );

            state.view = ViewModel::new(registry, metadata);
            state.page.audit = audit_rows(&state.view);
        }
        self.bump_revision();

        // Already logged; the audit table stays rendered either way.
        let _ = self.refresh_tasks().await;

        Ok(())
    }

    /// Fetch the task list and re-render it. On failure the previous list
    /// stays.
    pub async fn refresh_tasks(&self) -> Result<()> {
        let ticket = self.task_seq.issue();

        let tasks = match self.api.tasks().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!("Failed to refresh tasks: {}", e);
                return Err(e.into());
            }
        };

        {
            let mut state = self.state.write().await;
            if !self.task_seq.is_latest(ticket) {
                tracing::warn!(
                    "Discarding stale task list (request #{}, latest #{})",
                    ticket.number(),
                    self.task_seq.latest()
                );
                return Ok(());
            }

            state.page.tasks = task_list(&tasks);
        }
        self.bump_revision();

        Ok(())
    }

    /// Start a download task.
    ///
    /// On success the task list is refreshed right away and the task monitor
    /// becomes the active tab. Errors are returned for the caller to show.
    pub async fn submit(&self, request: DownloadRequest) -> Result<Task> {
        request.validate()?;

        let task = self.api.create_task(&request).await?;
        tracing::info!(
            "Started download task {} for {}",
            task.task_id,
            request.table_name
        );

        let _ = self.refresh_tasks().await;
        self.set_active_tab(Tab::Tasks).await;

        Ok(task)
    }

    /// Quick download from the dialog: table plus optional months.
    pub async fn quick_download(&self, table_name: &str, months: &str) -> Result<Task> {
        self.submit(DownloadRequest::quick(table_name, parse_list(months)))
            .await
    }

    /// Advanced form: every field editable.
    pub async fn advanced_download(
        &self,
        table_name: &str,
        symbols: &str,
        months: &str,
    ) -> Result<Task> {
        self.submit(DownloadRequest::from_form(table_name, symbols, months))
            .await
    }

    /// Ask the backend to stop a task, then refresh the task list.
    pub async fn stop_task(&self, task_id: &str) -> Result<String> {
        let response = self.api.stop_task(task_id).await?;
        tracing::info!("Stop requested for task {}", task_id);

        let _ = self.refresh_tasks().await;

        Ok(response.message)
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
