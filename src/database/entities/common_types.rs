use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Value type of a column (semantic meaning of the cell text)
///
/// The type drives value coercion everywhere a cell value is interpreted:
/// write-time normalization, filter operator applicability, and sort-key
/// comparison. Stored in the `columns.column_type` TEXT column in its
/// snake_case string form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    SingleLineText,
    MultiLineText,
    Checkbox,
    Select,
    Date,
    Number,
    UserRef,
}

impl ColumnType {
    /// Types whose values are free-form or enumerated text
    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            ColumnType::SingleLineText
                | ColumnType::MultiLineText
                | ColumnType::Select
                | ColumnType::UserRef
        )
    }

    /// Types with a meaningful total order for range operators
    pub fn is_orderable(&self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Date)
    }

    /// Normalize a JSON scalar into the canonical stored text for this type.
    ///
    /// Returns `Ok(None)` for JSON null (an explicitly cleared value).
    /// Numbers canonicalize through f64 display form so `5.0` and `5` store
    /// identically; checkboxes store `true`/`false`; dates must parse as
    /// RFC3339 or `YYYY-MM-DD` and are stored as sent.
    pub fn normalize_value(&self, value: &serde_json::Value) -> Result<Option<String>, String> {
        if value.is_null() {
            return Ok(None);
        }
        match self {
            ColumnType::SingleLineText
            | ColumnType::MultiLineText
            | ColumnType::Select
            | ColumnType::UserRef => match value.as_str() {
                Some(s) => Ok(Some(s.to_string())),
                None => Err(format!("expected a string for {} column", self)),
            },
            ColumnType::Checkbox => match value {
                serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
                serde_json::Value::String(s) if s == "true" || s == "false" => {
                    Ok(Some(s.clone()))
                }
                _ => Err("expected a boolean for checkbox column".to_string()),
            },
            ColumnType::Number => match value {
                serde_json::Value::Number(n) => {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| "number out of range".to_string())?;
                    Ok(Some(format!("{}", f)))
                }
                serde_json::Value::String(s) => match s.trim().parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(Some(format!("{}", f))),
                    _ => Err(format!("'{}' is not a number", s)),
                },
                _ => Err("expected a number for number column".to_string()),
            },
            ColumnType::Date => match value.as_str() {
                Some(s) if is_valid_date(s) => Ok(Some(s.to_string())),
                Some(s) => Err(format!("'{}' is not an ISO date", s)),
                None => Err("expected a date string for date column".to_string()),
            },
        }
    }
}

fn is_valid_date(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_string_roundtrip() {
        assert_eq!(ColumnType::SingleLineText.as_ref(), "single_line_text");
        assert_eq!(
            "number".parse::<ColumnType>().unwrap(),
            ColumnType::Number
        );
        assert!("not_a_type".parse::<ColumnType>().is_err());
    }

    #[test]
    fn test_number_normalization_is_canonical() {
        let ty = ColumnType::Number;
        assert_eq!(
            ty.normalize_value(&serde_json::json!(5.0)).unwrap(),
            Some("5".to_string())
        );
        assert_eq!(
            ty.normalize_value(&serde_json::json!("5")).unwrap(),
            Some("5".to_string())
        );
        assert_eq!(
            ty.normalize_value(&serde_json::json!(2.5)).unwrap(),
            Some("2.5".to_string())
        );
        assert!(ty.normalize_value(&serde_json::json!("abc")).is_err());
    }

    #[test]
    fn test_checkbox_and_date_normalization() {
        assert_eq!(
            ColumnType::Checkbox
                .normalize_value(&serde_json::json!(true))
                .unwrap(),
            Some("true".to_string())
        );
        assert!(ColumnType::Checkbox
            .normalize_value(&serde_json::json!(1))
            .is_err());

        assert!(ColumnType::Date
            .normalize_value(&serde_json::json!("2024-03-01"))
            .is_ok());
        assert!(ColumnType::Date
            .normalize_value(&serde_json::json!("2024-03-01T10:00:00Z"))
            .is_ok());
        assert!(ColumnType::Date
            .normalize_value(&serde_json::json!("yesterday"))
            .is_err());
    }

    #[test]
    fn test_null_clears_any_type() {
        for ty in [ColumnType::SingleLineText, ColumnType::Number, ColumnType::Checkbox] {
            assert_eq!(ty.normalize_value(&serde_json::Value::Null).unwrap(), None);
        }
    }
}
