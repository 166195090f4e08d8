use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Body of the download-task creation request.
///
/// `None` means "no filter" and is sent as JSON `null`; an empty list is
/// never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub table_name: String,
    pub symbols: Option<Vec<String>>,
    pub months: Option<Vec<String>>,
}

impl DownloadRequest {
    /// Quick path from the download dialog: no symbol filter.
    pub fn quick(table_name: impl Into<String>, months: Option<Vec<String>>) -> Self {
        Self::advanced(table_name, None, months)
    }

    pub fn advanced(
        table_name: impl Into<String>,
        symbols: Option<Vec<String>>,
        months: Option<Vec<String>>,
    ) -> Self {
        Self {
            table_name: table_name.into().trim().to_string(),
            symbols: symbols.and_then(normalize),
            months: months.and_then(normalize),
        }
    }

    /// Build from raw comma-separated form fields.
    pub fn from_form(table_name: &str, symbols: &str, months: &str) -> Self {
        Self::advanced(table_name, parse_list(symbols), parse_list(months))
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(Error::InvalidRequest("table name is required".to_string()));
        }
        Ok(())
    }
}

/// Split comma-separated input, trimming entries and dropping empty ones.
/// Returns `None` when nothing is left.
pub fn parse_list(raw: &str) -> Option<Vec<String>> {
    normalize(raw.split(',').map(str::to_string).collect())
}

fn normalize(values: Vec<String>) -> Option<Vec<String>> {
    let values: Vec<String> = values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("A, B"),
            Some(vec!["A".to_string(), "B".to_string()])
        );
        assert_eq!(parse_list(" A ,, ,B,"), Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(parse_list(""), None);
        assert_eq!(parse_list(" , ,"), None);
    }

    #[test]
    fn test_form_request_body() {
        let request = DownloadRequest::from_form("T1", "", "2023-01, 2023-02");

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "table_name": "T1",
                "symbols": null,
                "months": ["2023-01", "2023-02"]
            })
        );
    }

    #[test]
    fn test_quick_request_has_no_symbols() {
        let request = DownloadRequest::quick("cn_stock_em", Some(vec![]));
        assert_eq!(request.symbols, None);
        assert_eq!(request.months, None);
    }

    #[test]
    fn test_advanced_request_normalizes_lists() {
        let request = DownloadRequest::advanced(
            " sector_daily ",
            Some(vec!["BK0001".to_string(), " ".to_string()]),
            Some(vec![]),
        );
        assert_eq!(request.table_name, "sector_daily");
        assert_eq!(request.symbols, Some(vec!["BK0001".to_string()]));
        assert_eq!(request.months, None);
    }

    #[test]
    fn test_validate_requires_table_name() {
        assert!(DownloadRequest::from_form("  ", "", "").validate().is_err());
        assert!(DownloadRequest::from_form("T1", "", "").validate().is_ok());
    }
}
