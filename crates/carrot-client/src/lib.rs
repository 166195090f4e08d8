pub mod api;
pub mod client;
pub mod error;

// Re-exports
pub use api::{Health, MarketApi, StopResponse};
pub use client::{MarketClient, DEFAULT_BASE_URL};
pub use error::{Error, Result};
