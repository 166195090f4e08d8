use async_trait::async_trait;
use carrot_core::{DownloadRequest, Metadata, Registry, Task};
use serde::{Deserialize, Serialize};

use crate::Result;

/// HTTP surface of the market-data backend consumed by the dashboard.
#[async_trait]
pub trait MarketApi: Send + Sync {
    /// Table registry, in server order.
    async fn registry(&self) -> Result<Registry>;

    /// Storage metadata for tables that have data.
    async fn metadata(&self) -> Result<Metadata>;

    /// All known download tasks.
    async fn tasks(&self) -> Result<Vec<Task>>;

    async fn task(&self, task_id: &str) -> Result<Task>;

    /// Start a background download task.
    async fn create_task(&self, request: &DownloadRequest) -> Result<Task>;

    /// Signal a running task to stop.
    async fn stop_task(&self, task_id: &str) -> Result<StopResponse>;

    async fn health(&self) -> Result<Health>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub debug_mode: Option<bool>,
}
