use carrot_client::DEFAULT_BASE_URL;
use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::Result;

pub const ENV_PREFIX: &str = "CARROT";

/// Runtime settings: defaults, overridden by `CARROT_*` environment
/// variables (e.g. `CARROT_API_BASE_URL`, `CARROT_POLL_INTERVAL_SECS`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub host: String,
    pub port: u16,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    fn from_source(environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("api_base_url", DEFAULT_BASE_URL)?
            .set_default("poll_interval_secs", 3_i64)?
            .set_default("request_timeout_secs", 10_i64)?
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000_i64)?
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
