use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::{Error, Result};

/// Download task status as reported by the backend.
///
/// The backend emits upper-case names (`"RUNNING"`); matching is
/// case-insensitive and anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Stopped,
    Other(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Other(raw) => raw,
        }
    }

    /// Whether the backend still accepts a stop signal for this task.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            "stopped" => TaskStatus::Stopped,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    /// `None` when the backend sent no usable timestamp.
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl Task {
    /// First eight characters of the id followed by an ellipsis.
    pub fn short_id(&self) -> String {
        let head: String = self.task_id.chars().take(8).collect();
        format!("{}...", head)
    }
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (offset is dropped, wall-clock time kept) and the naive
/// ISO-8601 form the backend writes for local times.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_local());
    }

    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| Error::InvalidTimestamp(raw.to_string()))
}

// One malformed record must not fail the whole task listing.
fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|raw| parse_timestamp(raw).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_is_case_insensitive() {
        assert_eq!(TaskStatus::from("RUNNING".to_string()), TaskStatus::Running);
        assert_eq!(TaskStatus::from("stopped".to_string()), TaskStatus::Stopped);
        assert_eq!(
            TaskStatus::from("PAUSED".to_string()),
            TaskStatus::Other("PAUSED".to_string())
        );
    }

    #[test]
    fn test_task_from_backend_json() {
        let task: Task = serde_json::from_value(json!({
            "task_id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "task_type": "sector_download",
            "status": "RUNNING",
            "progress": 42.5,
            "message": "downloading 2025-01",
            "created_at": "2025-01-03T09:00:00",
            "updated_at": "2025-01-03T09:15:30.123456"
        }))
        .unwrap();

        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.progress, 42.5);
        assert_eq!(
            task.updated_at.unwrap().format("%H:%M:%S").to_string(),
            "09:15:30"
        );
        assert_eq!(task.task_type.as_deref(), Some("sector_download"));
        assert!(task.created_at.is_some());
    }

    #[test]
    fn test_task_defaults_optional_fields() {
        let task: Task = serde_json::from_value(json!({
            "task_id": "abc",
            "status": "pending",
            "updated_at": "2025-01-03T09:15:30Z"
        }))
        .unwrap();

        assert_eq!(task.progress, 0.0);
        assert!(task.message.is_empty());
        assert!(task.created_at.is_none());
    }

    #[test]
    fn test_bad_timestamp_does_not_fail_listing() {
        let tasks: Vec<Task> = serde_json::from_value(json!([
            {"task_id": "a", "status": "running", "updated_at": null},
            {"task_id": "b", "status": "running", "updated_at": "not a date"},
            {"task_id": "c", "status": "running"},
            {"task_id": "d", "status": "running", "updated_at": "2025-01-03T09:15:30"}
        ]))
        .unwrap();

        assert_eq!(tasks.len(), 4);
        assert!(tasks[..3].iter().all(|t| t.updated_at.is_none()));
        assert!(tasks[3].updated_at.is_some());
    }

    #[test]
    fn test_short_id() {
        let task: Task = serde_json::from_value(json!({
            "task_id": "0f8fad5b-d9cb-469f",
            "status": "completed",
            "updated_at": "2025-01-03 09:15:30"
        }))
        .unwrap();
        assert_eq!(task.short_id(), "0f8fad5b...");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2025-01-03T09:15:30+08:00").is_ok());
    }
}
