use async_trait::async_trait;
use carrot_core::{DownloadRequest, Metadata, Registry, Task};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::{Error, Health, MarketApi, Result, StopResponse};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";

#[derive(Clone)]
pub struct MarketClient {
    client: Client,
    base_url: Url,
}

impl MarketClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, client)
    }

    fn with_client(base_url: impl Into<String>, client: Client) -> Result<Self> {
        let raw = base_url.into();
        let base_url = match Url::parse(&raw) {
            Ok(url)
                if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() =>
            {
                url
            }
            _ => return Err(Error::InvalidBaseUrl(raw)),
        };

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Append path segments to the base URL. Each segment is percent-encoded
    /// on its own, so a `/` or `?` inside a task id cannot change the route.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments);
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        Self::parse(response).await
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.url(segments);
        tracing::debug!("POST {}", url);

        let mut request = self.client.post(url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(Error::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl MarketApi for MarketClient {
    async fn registry(&self) -> Result<Registry> {
        self.get_json(&["market", "registry"]).await
    }

    async fn metadata(&self) -> Result<Metadata> {
        self.get_json(&["market", "metadata"]).await
    }

    async fn tasks(&self) -> Result<Vec<Task>> {
        self.get_json(&["market", "tasks"]).await
    }

    async fn task(&self, task_id: &str) -> Result<Task> {
        self.get_json(&["market", "tasks", task_id]).await
    }

    async fn create_task(&self, request: &DownloadRequest) -> Result<Task> {
        tracing::info!(
            "Creating download task for {} (symbols: {:?}, months: {:?})",
            request.table_name,
            request.symbols,
            request.months
        );

        self.post_json(&["market", "tasks", "download"], Some(request)).await
    }

    async fn stop_task(&self, task_id: &str) -> Result<StopResponse> {
        tracing::info!("Stopping task {}", task_id);

        self.post_json::<(), _>(&["market", "tasks", task_id, "stop"], None)
            .await
    }

    async fn health(&self) -> Result<Health> {
        self.get_json(&["health"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrot_core::TaskStatus;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        assert!(MarketClient::new(DEFAULT_BASE_URL).is_ok());
        assert!(MarketClient::new("localhost:8000").is_err());

        let client = MarketClient::new("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
    }

    #[tokio::test]
    async fn test_registry_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/market/registry")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sector_daily": {"storage_type": "partition"}, "cn_stock_em": {"storage_type": "snapshot"}}"#)
            .create_async()
            .await;

        let client = MarketClient::new(format!("{}/api/v1", server.url())).unwrap();
        let registry = client.registry().await.unwrap();

        mock.assert_async().await;
        let names: Vec<&str> = registry.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["sector_daily", "cn_stock_em"]);
    }

    #[tokio::test]
    async fn test_tasks_listing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/market/tasks")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!([{
                    "task_id": "9b2c6d1e-0000-4000-8000-000000000000",
                    "status": "FAILED",
                    "progress": 12.0,
                    "message": "boom",
                    "updated_at": "2025-02-01T08:00:00"
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let tasks = client.tasks().await.unwrap();

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Failed);
    }

    #[tokio::test]
    async fn test_create_task_sends_null_filters() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/market/tasks/download")
            .match_body(Matcher::Json(json!({
                "table_name": "T1",
                "symbols": null,
                "months": ["2023-01", "2023-02"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "task_id": "new-task",
                    "status": "PENDING",
                    "progress": 0.0,
                    "message": "[T1] queued",
                    "updated_at": "2025-02-01T08:00:00"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let request = DownloadRequest::from_form("T1", "", "2023-01, 2023-02");
        let task = client.create_task(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(task.task_id, "new-task");
    }

    #[tokio::test]
    async fn test_error_carries_body_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/market/tasks/download")
            .with_status(500)
            .with_body(r#"{"detail":"unsupported table: T9"}"#)
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let err = client
            .create_task(&DownloadRequest::quick("T9", None))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), r#"{"detail":"unsupported table: T9"}"#);
    }

    #[tokio::test]
    async fn test_stop_task() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/market/tasks/abc/stop")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Task stop signal sent"}"#)
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let response = client.stop_task("abc").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.message, "Task stop signal sent");
    }

    #[tokio::test]
    async fn test_stop_task_encodes_id_as_one_segment() {
        let mut server = mockito::Server::new_async().await;
        let stop = server
            .mock("POST", "/market/tasks/a%2Fb%3Fc/stop")
            .with_status(200)
            .with_body(r#"{"message": "stopped"}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/market/tasks/download")
            .expect(0)
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        client.stop_task("a/b?c").await.unwrap();
        let _ = client.stop_task("x/../download?").await;

        stop.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_task_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/market/tasks/abc")
            .with_status(200)
            .with_body(
                json!({
                    "task_id": "abc",
                    "task_type": "download",
                    "status": "running",
                    "progress": 50.0,
                    "message": "halfway",
                    "created_at": "2025-02-01T07:59:00",
                    "updated_at": "2025-02-01T08:00:00+00:00"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let task = client.task("abc").await.unwrap();

        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.task_type.as_deref(), Some("download"));
        assert!(task.created_at.is_some());
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(r#"{"status": "ok", "app_name": "CarrotQuant Backend", "debug_mode": true}"#)
            .create_async()
            .await;

        let client = MarketClient::new(server.url()).unwrap();
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.debug_mode, Some(true));
    }
}
