//! Persisted view configuration shapes
//!
//! A view's `config` column holds one JSON blob:
//!
//! ```json
//! {
//!   "sorting": [{"columnId": 3, "direction": "asc"}],
//!   "filters": {"functionName": "and", "args": [...]},
//!   "hiddenColumns": [5]
//! }
//! ```
//!
//! `filters` stays a raw JSON value here and is parsed into the canonical
//! [`crate::query::filter::FilterNode`] tree on use, so a malformed stored
//! blob surfaces as a validation error instead of being silently ignored.

use serde::{Deserialize, Serialize};

use crate::errors::QueryError;

/// Sort direction for one sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn into_order(self) -> sea_orm::Order {
        match self {
            SortDirection::Asc => sea_orm::Order::Asc,
            SortDirection::Desc => sea_orm::Order::Desc,
        }
    }
}

/// One entry of a view's sort list; first entry is the primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub column_id: i32,
    pub direction: SortDirection,
}

/// The full per-view configuration blob
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    #[serde(default)]
    pub sorting: Vec<SortSpec>,
    #[serde(default)]
    pub filters: Option<serde_json::Value>,
    #[serde(default)]
    pub hidden_columns: Vec<i32>,
}

impl ViewConfig {
    /// Parse the stored JSON blob. A malformed blob is a server-side
    /// configuration error, reported as such rather than ignored.
    pub fn from_json(raw: &str) -> Result<Self, QueryError> {
        serde_json::from_str(raw)
            .map_err(|e| QueryError::Validation(format!("malformed view config: {}", e)))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("view config serialization cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_valid() {
        let config = ViewConfig::from_json("{}").unwrap();
        assert!(config.sorting.is_empty());
        assert!(config.filters.is_none());
        assert!(config.hidden_columns.is_empty());
    }

    #[test]
    fn test_config_wire_shape() {
        let config = ViewConfig::from_json(
            r#"{
                "sorting": [{"columnId": 3, "direction": "desc"}],
                "filters": {"functionName": "and", "args": []},
                "hiddenColumns": [5, 7]
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.sorting,
            vec![SortSpec {
                column_id: 3,
                direction: SortDirection::Desc
            }]
        );
        assert!(config.filters.is_some());
        assert_eq!(config.hidden_columns, vec![5, 7]);
    }

    #[test]
    fn test_roundtrip_uses_camel_case() {
        let config = ViewConfig {
            sorting: vec![SortSpec {
                column_id: 1,
                direction: SortDirection::Asc,
            }],
            filters: None,
            hidden_columns: vec![2],
        };
        let json = config.to_json();
        assert!(json.contains("columnId"));
        assert!(json.contains("hiddenColumns"));
        assert!(json.contains(r#""direction":"asc""#));
    }

    #[test]
    fn test_malformed_config_is_rejected() {
        assert!(ViewConfig::from_json("not json").is_err());
        assert!(ViewConfig::from_json(r#"{"sorting": 3}"#).is_err());
    }
}
