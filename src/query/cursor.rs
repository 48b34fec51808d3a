//! Keyset pagination cursor: opaque token plus boundary predicate
//!
//! A cursor records the previous page's last row: one value per active sort
//! key (in sort-key order) plus the row id tiebreaker. Seek pagination
//! resumes from those values instead of a numeric offset, so concurrent
//! inserts and deletes can neither skip nor repeat rows. The token round-
//! trips through the client as URL-safe base64 over the JSON encoding and is
//! never persisted server-side.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sea_orm::sea_query::{Condition, Expr};
use serde::{Deserialize, Serialize};

use crate::database::entities::{common_types::ColumnType, rows};
use crate::errors::QueryError;
use crate::query::config::SortDirection;
use crate::query::sort::SortKey;

/// Last-seen value for one sort key; `value` is null when the row had no
/// cell (or a cleared cell) for that column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorVal {
    pub col_id: i32,
    pub value: Option<serde_json::Value>,
    pub direction: SortDirection,
}

/// Page-boundary cursor: sort-key values of the previous page's last row
/// plus its row id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub row_id: i32,
    pub cursor_vals: Vec<CursorVal>,
}

impl Cursor {
    /// Encode into the opaque continuation token handed to clients
    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("cursor serialization cannot fail");
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a client-supplied continuation token
    pub fn decode(token: &str) -> Result<Self, QueryError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| invalid("token is not valid base64"))?;
        serde_json::from_slice(&bytes).map_err(|_| invalid("token does not decode to a cursor"))
    }
}

// Typed bind value for one boundary position
enum BoundValue {
    Null,
    Num(f64),
    Text(String),
}

/// Build the "strictly after the cursor row" predicate.
///
/// Lexicographic over the sort keys: one disjunct per key prefix, equality
/// on the prefix and strict inequality at the break position, with
/// `rows.id > ?` as the final disjunct. NULL is the minimum in both
/// directions: a null cursor value is passed by any non-null row value, and
/// a non-null cursor value is never passed by a null row value (plain SQL
/// comparison already excludes NULL there).
///
/// The cursor must match the resolved sort keys position by position;
/// anything else means the view's sort changed since the token was issued
/// and the caller must restart from page one.
pub fn boundary_condition(cursor: &Cursor, keys: &[SortKey]) -> Result<Condition, QueryError> {
    if cursor.cursor_vals.len() != keys.len() {
        return Err(invalid(format!(
            "cursor has {} sort values but the view sorts by {} columns",
            cursor.cursor_vals.len(),
            keys.len()
        )));
    }

    let mut bounds: Vec<BoundValue> = Vec::with_capacity(keys.len());
    for (cursor_val, key) in cursor.cursor_vals.iter().zip(keys) {
        if cursor_val.col_id != key.column_id {
            return Err(invalid(format!(
                "cursor value for column {} does not match sort column {}",
                cursor_val.col_id, key.column_id
            )));
        }
        if cursor_val.direction != key.direction {
            return Err(invalid(format!(
                "cursor direction for column {} does not match the view",
                cursor_val.col_id
            )));
        }
        bounds.push(bind_value(cursor_val, key)?);
    }

    let mut boundary = Condition::any();
    for break_pos in 0..=keys.len() {
        let mut arm = Condition::all();
        for j in 0..break_pos {
            arm = arm.add(match &bounds[j] {
                BoundValue::Null => Expr::expr(keys[j].expr.clone()).is_null(),
                BoundValue::Num(n) => Expr::expr(keys[j].expr.clone()).eq(*n),
                BoundValue::Text(s) => Expr::expr(keys[j].expr.clone()).eq(s.clone()),
            });
        }
        if break_pos < keys.len() {
            let key = &keys[break_pos];
            let lhs = Expr::expr(key.expr.clone());
            arm = arm.add(match (&bounds[break_pos], key.direction) {
                (BoundValue::Null, _) => lhs.is_not_null(),
                (BoundValue::Num(n), SortDirection::Asc) => lhs.gt(*n),
                (BoundValue::Num(n), SortDirection::Desc) => lhs.lt(*n),
                (BoundValue::Text(s), SortDirection::Asc) => lhs.gt(s.clone()),
                (BoundValue::Text(s), SortDirection::Desc) => lhs.lt(s.clone()),
            });
        } else {
            arm = arm.add(Expr::col((rows::Entity, rows::Column::Id)).gt(cursor.row_id));
        }
        boundary = boundary.add(arm);
    }
    Ok(boundary)
}

fn bind_value(cursor_val: &CursorVal, key: &SortKey) -> Result<BoundValue, QueryError> {
    match &cursor_val.value {
        None => Ok(BoundValue::Null),
        Some(value) if key.column_type == ColumnType::Number => value
            .as_f64()
            .map(BoundValue::Num)
            .ok_or_else(|| {
                invalid(format!(
                    "cursor value for number column {} is not numeric",
                    cursor_val.col_id
                ))
            }),
        Some(value) => value
            .as_str()
            .map(|s| BoundValue::Text(s.to_string()))
            .ok_or_else(|| {
                invalid(format!(
                    "cursor value for column {} is not a string",
                    cursor_val.col_id
                ))
            }),
    }
}

fn invalid(message: impl Into<String>) -> QueryError {
    QueryError::InvalidCursor(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::entities::common_types::ColumnType;
    use crate::query::config::SortSpec;
    use crate::query::filter::ColumnTypeMap;
    use crate::query::sort::resolve_sort_keys;
    use sea_orm::sea_query::{Query, QueryStatementWriter, SqliteQueryBuilder};

    fn keys() -> Vec<crate::query::sort::SortKey> {
        let mut types = ColumnTypeMap::new();
        types.insert(1, ColumnType::Number);
        types.insert(2, ColumnType::SingleLineText);
        resolve_sort_keys(
            &[
                SortSpec {
                    column_id: 1,
                    direction: SortDirection::Asc,
                },
                SortSpec {
                    column_id: 2,
                    direction: SortDirection::Desc,
                },
            ],
            &types,
        )
        .unwrap()
    }

    fn cursor() -> Cursor {
        Cursor {
            row_id: 7,
            cursor_vals: vec![
                CursorVal {
                    col_id: 1,
                    value: Some(serde_json::json!(5.0)),
                    direction: SortDirection::Asc,
                },
                CursorVal {
                    col_id: 2,
                    value: Some(serde_json::json!("b")),
                    direction: SortDirection::Desc,
                },
            ],
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let original = cursor();
        let decoded = Cursor::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_token_with_null_value_roundtrip() {
        let original = Cursor {
            row_id: 3,
            cursor_vals: vec![CursorVal {
                col_id: 1,
                value: None,
                direction: SortDirection::Asc,
            }],
        };
        let decoded = Cursor::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_garbage_tokens_are_rejected() {
        assert!(matches!(
            Cursor::decode("!!!not-base64!!!"),
            Err(QueryError::InvalidCursor(_))
        ));
        let not_a_cursor = URL_SAFE_NO_PAD.encode(b"{\"rowId\": \"x\"}");
        assert!(matches!(
            Cursor::decode(&not_a_cursor),
            Err(QueryError::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_boundary_shape() {
        let condition = boundary_condition(&cursor(), &keys()).unwrap();
        let mut query = Query::select();
        query
            .from(crate::database::entities::rows::Entity)
            .cond_where(condition);
        let sql = query.to_string(SqliteQueryBuilder);
        // three disjuncts: break at key 0, break at key 1, row id tiebreak
        assert!(sql.contains(">"), "no strict inequality in: {}", sql);
        assert!(sql.contains("<"), "desc key must compare with < in: {}", sql);
        assert!(sql.contains("\"id\" > 7"), "no row id arm in: {}", sql);
    }

    #[test]
    fn test_null_cursor_value_produces_is_not_null_arm() {
        let cursor = Cursor {
            row_id: 7,
            cursor_vals: vec![
                CursorVal {
                    col_id: 1,
                    value: None,
                    direction: SortDirection::Asc,
                },
                CursorVal {
                    col_id: 2,
                    value: Some(serde_json::json!("b")),
                    direction: SortDirection::Desc,
                },
            ],
        };
        let condition = boundary_condition(&cursor, &keys()).unwrap();
        let mut query = Query::select();
        query
            .from(crate::database::entities::rows::Entity)
            .cond_where(condition);
        let sql = query.to_string(SqliteQueryBuilder);
        assert!(sql.contains("IS NOT NULL"), "no after-null arm in: {}", sql);
        assert!(sql.contains("IS NULL"), "no null-equality arm in: {}", sql);
    }

    #[test]
    fn test_shape_mismatches_are_rejected() {
        let keys = keys();

        // too few values
        let mut short = cursor();
        short.cursor_vals.pop();
        assert!(matches!(
            boundary_condition(&short, &keys),
            Err(QueryError::InvalidCursor(_))
        ));

        // wrong column id
        let mut wrong_col = cursor();
        wrong_col.cursor_vals[0].col_id = 99;
        assert!(matches!(
            boundary_condition(&wrong_col, &keys),
            Err(QueryError::InvalidCursor(_))
        ));

        // wrong direction
        let mut wrong_dir = cursor();
        wrong_dir.cursor_vals[1].direction = SortDirection::Asc;
        assert!(matches!(
            boundary_condition(&wrong_dir, &keys),
            Err(QueryError::InvalidCursor(_))
        ));

        // non-numeric value for a number sort key
        let mut wrong_type = cursor();
        wrong_type.cursor_vals[0].value = Some(serde_json::json!("five"));
        assert!(matches!(
            boundary_condition(&wrong_type, &keys),
            Err(QueryError::InvalidCursor(_))
        ));
    }
}
