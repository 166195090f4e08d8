//! Projections from fetched backend data to renderable rows.
//!
//! Everything here is pure: the controller owns the [`ViewModel`] and passes
//! it in, and every call produces a complete replacement of the previous
//! output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Metadata, Registry, Task, TaskStatus};

pub const DATE_RANGE_PLACEHOLDER: &str = "-";
/// Shown for a task whose update time could not be read.
pub const TIME_PLACEHOLDER: &str = "-";

/// Reference data shown on the audit tab.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub registry: Registry,
    pub metadata: Metadata,
}

impl ViewModel {
    pub fn new(registry: Registry, metadata: Metadata) -> Self {
        Self { registry, metadata }
    }
}

/// Top-level sections of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Audit,
    Tasks,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Audit => "audit",
            Tab::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "audit" => Ok(Tab::Audit),
            "tasks" => Ok(Tab::Tasks),
            other => Err(Error::UnknownTab(other.to_string())),
        }
    }
}

/// Whether a registered table has any stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Ready,
    Missing,
}

impl Availability {
    pub fn label(&self) -> &'static str {
        match self {
            Availability::Ready => "ready",
            Availability::Missing => "missing",
        }
    }

    /// Both labels open the same download dialog.
    pub fn action_label(&self) -> &'static str {
        match self {
            Availability::Ready => "supplement download",
            Availability::Missing => "download now",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    pub table_name: String,
    pub storage_type: String,
    pub row_count: u64,
    pub date_range: String,
    pub availability: Availability,
    pub action_label: &'static str,
}

/// One row per registered table, in registry order.
pub fn audit_rows(view: &ViewModel) -> Vec<AuditRow> {
    view.registry
        .iter()
        .map(|(name, config)| {
            let meta = view.metadata.get(name);
            let availability = if meta.is_some() {
                Availability::Ready
            } else {
                Availability::Missing
            };

            AuditRow {
                table_name: name.to_string(),
                storage_type: config.storage_type.clone(),
                row_count: meta.map(|m| m.row_count).unwrap_or(0),
                date_range: meta
                    .map(|m| m.date_range())
                    .unwrap_or_else(|| DATE_RANGE_PLACEHOLDER.to_string()),
                availability,
                action_label: availability.action_label(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    /// `None` for statuses the dashboard does not know.
    pub style: Option<&'static str>,
}

impl TaskStatus {
    pub fn badge(&self) -> StatusBadge {
        let (label, style) = match self {
            TaskStatus::Pending => ("Pending", "badge-secondary"),
            TaskStatus::Running => ("Running", "badge-primary"),
            TaskStatus::Completed => ("Completed", "badge-success"),
            TaskStatus::Failed => ("Failed", "badge-danger"),
            TaskStatus::Stopped => ("Stopped", "badge-warning"),
            TaskStatus::Other(raw) => {
                return StatusBadge {
                    label: raw.clone(),
                    style: None,
                }
            }
        };

        StatusBadge {
            label: label.to_string(),
            style: Some(style),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskCard {
    pub task_id: String,
    pub short_id: String,
    pub badge: StatusBadge,
    pub message: String,
    /// Progress bar width in percent, passed through unclamped.
    pub progress: f64,
    pub updated_time: String,
    pub stoppable: bool,
}

impl From<&Task> for TaskCard {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id.clone(),
            short_id: task.short_id(),
            badge: task.status.badge(),
            message: task.message.clone(),
            progress: task.progress,
            updated_time: task
                .updated_at
                .map(|at| at.format("%H:%M:%S").to_string())
                .unwrap_or_else(|| TIME_PLACEHOLDER.to_string()),
            stoppable: task.status.is_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskList {
    Empty,
    Cards(Vec<TaskCard>),
}

impl TaskList {
    pub fn cards(&self) -> &[TaskCard] {
        match self {
            TaskList::Empty => &[],
            TaskList::Cards(cards) => cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TaskList::Empty)
    }
}

impl Default for TaskList {
    fn default() -> Self {
        TaskList::Empty
    }
}

/// Most recently updated first. Tasks without an update time go last.
pub fn task_list(tasks: &[Task]) -> TaskList {
    if tasks.is_empty() {
        return TaskList::Empty;
    }

    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

    TaskList::Cards(sorted.into_iter().map(TaskCard::from).collect())
}
