use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Storage layout assumed by the backend when a table omits it.
pub const DEFAULT_STORAGE_TYPE: &str = "partition";

/// Per-table configuration from the backend's table registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_storage_type")]
    pub storage_type: String,
    /// Remaining config fields, kept opaque.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableConfig {
    pub fn new(storage_type: impl Into<String>) -> Self {
        Self {
            storage_type: storage_type.into(),
            extra: Map::new(),
        }
    }
}

fn default_storage_type() -> String {
    DEFAULT_STORAGE_TYPE.to_string()
}

/// Table registry keyed by table name, in the order the server sent it.
pub type Registry = IndexMap<String, TableConfig>;

/// Storage statistics for a table that has data on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    #[serde(default)]
    pub row_count: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_date: String,
}

// Empty tables report null bounds.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl TableMetadata {
    pub fn date_range(&self) -> String {
        format!("{} ~ {}", self.start_date, self.end_date)
    }
}

/// Metadata keyed by table name. A missing key means no data is stored.
pub type Metadata = HashMap<String, TableMetadata>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keeps_server_order() {
        let registry: Registry = serde_json::from_str(
            r#"{
                "zz_last_alphabetically": {"storage_type": "snapshot"},
                "aa_first_alphabetically": {"storage_type": "partition"},
                "mm_middle": {"storage_type": "partition"}
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = registry.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["zz_last_alphabetically", "aa_first_alphabetically", "mm_middle"]
        );
    }

    #[test]
    fn test_table_config_keeps_extra_fields() {
        let registry: Registry = serde_json::from_str(
            r#"{"cn_stock_em": {"storage_type": "snapshot", "download_config": {"source": "em"}}}"#,
        )
        .unwrap();

        let config = registry.get("cn_stock_em").unwrap();
        assert_eq!(config.storage_type, "snapshot");
        assert_eq!(config.extra["download_config"]["source"], "em");
    }

    #[test]
    fn test_missing_storage_type_defaults_to_partition() {
        let registry: Registry = serde_json::from_str(r#"{"t": {}}"#).unwrap();
        assert_eq!(registry.get("t").unwrap().storage_type, DEFAULT_STORAGE_TYPE);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut registry: Registry = serde_json::from_str(
            r#"{"a": {"storage_type": "snapshot"}, "b": {"storage_type": "partition"}}"#,
        )
        .unwrap();
        registry.insert("a".to_string(), TableConfig::new("partition"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.keys().next().map(String::as_str), Some("a"));
        assert_eq!(registry.get("a").unwrap().storage_type, "partition");
    }

    #[test]
    fn test_metadata_tolerates_null_bounds() {
        let metadata: Metadata = serde_json::from_str(
            r#"{"t": {"row_count": 0, "start_date": null, "end_date": null}}"#,
        )
        .unwrap();
        assert_eq!(metadata["t"].start_date, "");
    }

    #[test]
    fn test_metadata_date_range() {
        let meta = TableMetadata {
            row_count: 10,
            start_date: "2023-01-01".to_string(),
            end_date: "2023-12-31".to_string(),
        };
        assert_eq!(meta.date_range(), "2023-01-01 ~ 2023-12-31");
    }
}
