pub mod error;
pub mod market;
pub mod request;
pub mod task;
pub mod view;

// Re-exports
pub use error::{Error, Result};
pub use market::{Metadata, Registry, TableConfig, TableMetadata};
pub use request::{parse_list, DownloadRequest};
pub use task::{Task, TaskStatus};
pub use view::{
    audit_rows, task_list, AuditRow, Availability, StatusBadge, Tab, TaskCard, TaskList,
    ViewModel,
};
