pub mod config;
pub mod controller;
pub mod error;
pub mod html;
pub mod poller;
pub mod sequence;

// Re-exports
pub use self::config::DashboardConfig;
pub use controller::{Dashboard, Page};
pub use error::{Error, Result};
pub use html::{DownloadForm, HtmlRenderer, PageOptions};
pub use poller::Poller;
pub use sequence::{RequestSequence, Ticket};
