//! Filter compiler: nested boolean filter trees over EAV cell storage
//!
//! A filter is a recursive tree of groups (`and`/`or`) and leaves
//! (`operator(columnId, value)`), persisted as `{functionName, args}` JSON.
//! Because column values are cell records rather than row columns, each leaf
//! compiles to a correlated existence predicate:
//!
//! ```sql
//! EXISTS (SELECT 1 FROM cells
//!         WHERE cells.row_id = rows.id
//!           AND cells.column_id = ?
//!           AND <value test>)
//! ```
//!
//! Groups combine their children with `Condition::all()`/`Condition::any()`.
//! Compilation is pure: the same tree always produces an equivalent
//! predicate.

use std::collections::HashMap;

use sea_orm::sea_query::{
    Condition, Expr, Func, LikeExpr, Query, SelectStatement, SimpleExpr,
};
use strum::{AsRefStr, Display, EnumString};

use crate::database::entities::{cells, common_types::ColumnType, rows};
use crate::errors::QueryError;

/// Column id → declared type, for operator applicability and value coercion
pub type ColumnTypeMap = HashMap<i32, ColumnType>;

/// Boolean combinator of a filter group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

/// Comparison operator of a filter leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString)]
pub enum FilterOperator {
    #[strum(to_string = "equals", serialize = "eq")]
    Equals,
    #[strum(to_string = "notEquals", serialize = "neq")]
    NotEquals,
    #[strum(to_string = "contains")]
    Contains,
    #[strum(to_string = "notContains")]
    NotContains,
    #[strum(to_string = "startsWith")]
    StartsWith,
    #[strum(to_string = "endsWith")]
    EndsWith,
    #[strum(to_string = "greaterThan", serialize = "gt")]
    GreaterThan,
    #[strum(to_string = "lessThan", serialize = "lt")]
    LessThan,
    #[strum(to_string = "gte")]
    Gte,
    #[strum(to_string = "lte")]
    Lte,
    #[strum(to_string = "isEmpty")]
    IsEmpty,
    #[strum(to_string = "isNotEmpty")]
    IsNotEmpty,
}

impl FilterOperator {
    /// isEmpty / isNotEmpty take no comparison value
    pub fn requires_value(&self) -> bool {
        !matches!(self, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty)
    }

    /// Which column types an operator is valid against
    pub fn applies_to(&self, column_type: ColumnType) -> bool {
        match self {
            FilterOperator::Equals
            | FilterOperator::NotEquals
            | FilterOperator::IsEmpty
            | FilterOperator::IsNotEmpty => true,
            FilterOperator::Contains
            | FilterOperator::NotContains
            | FilterOperator::StartsWith
            | FilterOperator::EndsWith => column_type.is_textual(),
            FilterOperator::GreaterThan
            | FilterOperator::LessThan
            | FilterOperator::Gte
            | FilterOperator::Lte => column_type.is_orderable(),
        }
    }
}

/// Canonical recursive filter representation
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    Group {
        op: BoolOp,
        children: Vec<FilterNode>,
    },
    Leaf {
        column_id: i32,
        operator: FilterOperator,
        value: Option<serde_json::Value>,
    },
}

impl FilterNode {
    /// Parse the persisted `{functionName, args}` JSON shape.
    ///
    /// Group args may hold leaves or nested groups; the flat one-level shape
    /// is simply a tree of depth one.
    pub fn from_config(value: &serde_json::Value) -> Result<Self, QueryError> {
        let obj = value
            .as_object()
            .ok_or_else(|| validation("filter node must be an object"))?;
        let function_name = obj
            .get("functionName")
            .and_then(|v| v.as_str())
            .ok_or_else(|| validation("filter node is missing functionName"))?;
        let args = obj
            .get("args")
            .and_then(|v| v.as_array())
            .ok_or_else(|| validation("filter node is missing args"))?;

        match function_name {
            "and" | "or" => {
                if args.is_empty() {
                    return Err(validation("filter group has no conditions"));
                }
                let op = if function_name == "and" {
                    BoolOp::And
                } else {
                    BoolOp::Or
                };
                let children = args
                    .iter()
                    .map(FilterNode::from_config)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(FilterNode::Group { op, children })
            }
            name => {
                let operator = name.parse::<FilterOperator>().map_err(|_| {
                    validation(format!("unknown filter operator '{}'", name))
                })?;
                // Leaves are [columnId, value]; the value slot may be absent
                // for the two no-value operators
                let arg_count_ok = if operator.requires_value() {
                    args.len() == 2
                } else {
                    args.len() == 1 || args.len() == 2
                };
                if !arg_count_ok {
                    return Err(validation(format!(
                        "filter leaf '{}' expects [columnId, value], got {} args",
                        name,
                        args.len()
                    )));
                }
                let column_id = args[0]
                    .as_i64()
                    .and_then(|id| i32::try_from(id).ok())
                    .ok_or_else(|| {
                        validation(format!("filter leaf '{}' has a non-integer column id", name))
                    })?;
                let value = args.get(1).cloned().filter(|v| !v.is_null());
                Ok(FilterNode::Leaf {
                    column_id,
                    operator,
                    value,
                })
            }
        }
    }
}

/// Compile a filter tree into a WHERE condition over the `rows` relation
pub fn compile_filter(node: &FilterNode, types: &ColumnTypeMap) -> Result<Condition, QueryError> {
    match node {
        FilterNode::Group { op, children } => {
            let mut condition = match op {
                BoolOp::And => Condition::all(),
                BoolOp::Or => Condition::any(),
            };
            for child in children {
                condition = condition.add(compile_filter(child, types)?);
            }
            Ok(condition)
        }
        FilterNode::Leaf {
            column_id,
            operator,
            value,
        } => compile_leaf(*column_id, *operator, value.as_ref(), types),
    }
}

fn compile_leaf(
    column_id: i32,
    operator: FilterOperator,
    value: Option<&serde_json::Value>,
    types: &ColumnTypeMap,
) -> Result<Condition, QueryError> {
    let column_type = *types.get(&column_id).ok_or_else(|| {
        validation(format!("filter references unknown column {}", column_id))
    })?;
    if !operator.applies_to(column_type) {
        return Err(validation(format!(
            "operator '{}' is not applicable to a {} column",
            operator, column_type
        )));
    }

    // Emptiness is the absence of a cell or a null/empty value; the two
    // operators are exact complements
    if !operator.requires_value() {
        let exists = Condition::all().add(Expr::exists(non_empty_cell_subquery(column_id)));
        return Ok(match operator {
            FilterOperator::IsEmpty => exists.not(),
            _ => exists,
        });
    }

    let raw = value.ok_or_else(|| {
        validation(format!("operator '{}' requires a comparison value", operator))
    })?;

    let value_test = match operator {
        FilterOperator::Equals => equality_test(column_type, raw, false)?,
        FilterOperator::NotEquals => equality_test(column_type, raw, true)?,
        FilterOperator::Contains => like_test(raw, true, true, false)?,
        FilterOperator::NotContains => like_test(raw, true, true, true)?,
        FilterOperator::StartsWith => like_test(raw, false, true, false)?,
        FilterOperator::EndsWith => like_test(raw, true, false, false)?,
        FilterOperator::GreaterThan
        | FilterOperator::LessThan
        | FilterOperator::Gte
        | FilterOperator::Lte => range_test(column_type, operator, raw)?,
        FilterOperator::IsEmpty | FilterOperator::IsNotEmpty => unreachable!(),
    };

    Ok(Condition::all().add(Expr::exists(cell_subquery(column_id, Some(value_test)))))
}

/// `EXISTS (SELECT 1 FROM cells WHERE row correlation AND column pin AND test)`
fn cell_subquery(column_id: i32, value_test: Option<SimpleExpr>) -> SelectStatement {
    let mut query = Query::select();
    query
        .expr(Expr::value(1))
        .from(cells::Entity)
        .and_where(
            Expr::col((cells::Entity, cells::Column::RowId))
                .equals((rows::Entity, rows::Column::Id)),
        )
        .and_where(Expr::col((cells::Entity, cells::Column::ColumnId)).eq(column_id));
    if let Some(test) = value_test {
        query.and_where(test);
    }
    query
}

fn non_empty_cell_subquery(column_id: i32) -> SelectStatement {
    let mut query = cell_subquery(column_id, None);
    query
        .and_where(Expr::col((cells::Entity, cells::Column::Value)).is_not_null())
        .and_where(Expr::col((cells::Entity, cells::Column::Value)).ne(""));
    query
}

fn equality_test(
    column_type: ColumnType,
    raw: &serde_json::Value,
    negated: bool,
) -> Result<SimpleExpr, QueryError> {
    // Numbers compare numerically so 5, 5.0 and "5" are the same value;
    // everything else compares the normalized text
    if column_type == ColumnType::Number {
        let operand = numeric_operand(raw)?;
        let lhs = Expr::expr(cast_to_real(value_col()));
        return Ok(if negated {
            lhs.ne(operand)
        } else {
            lhs.eq(operand)
        });
    }
    let operand = column_type
        .normalize_value(raw)
        .map_err(validation)?
        .ok_or_else(|| validation("comparison value must not be null"))?;
    let lhs = Expr::expr(value_col());
    Ok(if negated {
        lhs.ne(operand)
    } else {
        lhs.eq(operand)
    })
}

fn like_test(
    raw: &serde_json::Value,
    leading_wildcard: bool,
    trailing_wildcard: bool,
    negated: bool,
) -> Result<SimpleExpr, QueryError> {
    let needle = raw
        .as_str()
        .ok_or_else(|| validation("text operators expect a string value"))?;
    let pattern = format!(
        "{}{}{}",
        if leading_wildcard { "%" } else { "" },
        escape_like(&needle.to_lowercase()),
        if trailing_wildcard { "%" } else { "" },
    );
    let lowered = Expr::expr(Func::lower(value_col()));
    let like = LikeExpr::new(pattern).escape('\\');
    Ok(if negated {
        lowered.not_like(like)
    } else {
        lowered.like(like)
    })
}

fn range_test(
    column_type: ColumnType,
    operator: FilterOperator,
    raw: &serde_json::Value,
) -> Result<SimpleExpr, QueryError> {
    if column_type == ColumnType::Number {
        let operand = numeric_operand(raw)?;
        let lhs = Expr::expr(cast_to_real(value_col()));
        return Ok(apply_range(lhs, operator, operand));
    }
    // Date columns hold ISO-8601 text; lexicographic order is chronological
    let operand = raw
        .as_str()
        .ok_or_else(|| validation("date operators expect a string value"))?
        .to_string();
    Ok(apply_range(Expr::expr(value_col()), operator, operand))
}

fn apply_range<V>(lhs: Expr, operator: FilterOperator, operand: V) -> SimpleExpr
where
    V: Into<SimpleExpr>,
{
    match operator {
        FilterOperator::GreaterThan => lhs.gt(operand),
        FilterOperator::LessThan => lhs.lt(operand),
        FilterOperator::Gte => lhs.gte(operand),
        FilterOperator::Lte => lhs.lte(operand),
        _ => unreachable!(),
    }
}

fn numeric_operand(raw: &serde_json::Value) -> Result<f64, QueryError> {
    match raw {
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| validation("number out of range")),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| validation(format!("'{}' is not a number", s))),
        _ => Err(validation("numeric operators expect a number value")),
    }
}

fn value_col() -> Expr {
    Expr::col((cells::Entity, cells::Column::Value))
}

/// Non-numeric text casts to 0.0 in SQLite; number-column values are
/// normalized on write, so this only matters for out-of-band data
fn cast_to_real(expr: Expr) -> SimpleExpr {
    expr.cast_as(sea_orm::sea_query::Alias::new("REAL"))
}

fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn validation(message: impl Into<String>) -> QueryError {
    QueryError::Validation(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::sea_query::{QueryStatementWriter, SqliteQueryBuilder};

    fn types() -> ColumnTypeMap {
        let mut map = ColumnTypeMap::new();
        map.insert(1, ColumnType::SingleLineText);
        map.insert(2, ColumnType::Number);
        map.insert(3, ColumnType::Date);
        map.insert(4, ColumnType::Checkbox);
        map
    }

    fn render(condition: Condition) -> String {
        let mut query = Query::select();
        query.from(rows::Entity).cond_where(condition);
        query.to_string(SqliteQueryBuilder)
    }

    #[test]
    fn test_parse_flat_group() {
        let node = FilterNode::from_config(&serde_json::json!({
            "functionName": "and",
            "args": [
                {"functionName": "contains", "args": [1, "a"]},
                {"functionName": "gt", "args": [2, 5]}
            ]
        }))
        .unwrap();
        match node {
            FilterNode::Group { op, children } => {
                assert_eq!(op, BoolOp::And);
                assert_eq!(children.len(), 2);
            }
            _ => panic!("expected a group"),
        }
    }

    #[test]
    fn test_parse_nested_group() {
        let node = FilterNode::from_config(&serde_json::json!({
            "functionName": "or",
            "args": [
                {"functionName": "equals", "args": [1, "x"]},
                {"functionName": "and", "args": [
                    {"functionName": "gte", "args": [2, 1]},
                    {"functionName": "lte", "args": [2, 9]}
                ]}
            ]
        }))
        .unwrap();
        match node {
            FilterNode::Group { op, children } => {
                assert_eq!(op, BoolOp::Or);
                assert!(matches!(children[1], FilterNode::Group { .. }));
            }
            _ => panic!("expected a group"),
        }
    }

    #[test]
    fn test_parse_operator_aliases() {
        for (alias, canonical) in [
            ("eq", FilterOperator::Equals),
            ("neq", FilterOperator::NotEquals),
            ("gt", FilterOperator::GreaterThan),
            ("lt", FilterOperator::LessThan),
        ] {
            let node = FilterNode::from_config(&serde_json::json!({
                "functionName": alias,
                "args": [2, 1]
            }))
            .unwrap();
            match node {
                FilterNode::Leaf { operator, .. } => assert_eq!(operator, canonical),
                _ => panic!("expected a leaf"),
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed_nodes() {
        for bad in [
            serde_json::json!({"functionName": "and", "args": []}),
            serde_json::json!({"functionName": "between", "args": [1, 2]}),
            serde_json::json!({"args": [1, 2]}),
            serde_json::json!({"functionName": "equals"}),
            serde_json::json!({"functionName": "equals", "args": [1]}),
            serde_json::json!({"functionName": "equals", "args": ["name", "x"]}),
            serde_json::json!(42),
        ] {
            assert!(FilterNode::from_config(&bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_is_empty_allows_missing_value_arg() {
        for args in [serde_json::json!([1]), serde_json::json!([1, null])] {
            let node = FilterNode::from_config(&serde_json::json!({
                "functionName": "isEmpty",
                "args": args
            }))
            .unwrap();
            assert!(matches!(
                node,
                FilterNode::Leaf {
                    operator: FilterOperator::IsEmpty,
                    value: None,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_leaf_compiles_to_exists_subquery() {
        let node = FilterNode::Leaf {
            column_id: 1,
            operator: FilterOperator::Contains,
            value: Some(serde_json::json!("abc")),
        };
        let sql = render(compile_filter(&node, &types()).unwrap());
        assert!(sql.contains("EXISTS"), "no EXISTS in: {}", sql);
        assert!(sql.contains("LOWER"), "no LOWER in: {}", sql);
        assert!(sql.contains("%abc%"), "no pattern in: {}", sql);
    }

    #[test]
    fn test_is_empty_compiles_to_not_exists() {
        let node = FilterNode::Leaf {
            column_id: 1,
            operator: FilterOperator::IsEmpty,
            value: None,
        };
        let sql = render(compile_filter(&node, &types()).unwrap());
        assert!(sql.contains("NOT"), "no negation in: {}", sql);
        assert!(sql.contains("EXISTS"), "no EXISTS in: {}", sql);
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        let node = FilterNode::Leaf {
            column_id: 1,
            operator: FilterOperator::Contains,
            value: Some(serde_json::json!("50%_done")),
        };
        let sql = render(compile_filter(&node, &types()).unwrap());
        assert!(sql.contains("\\%"), "unescaped %% in: {}", sql);
        assert!(sql.contains("\\_"), "unescaped _ in: {}", sql);
    }

    #[test]
    fn test_operator_type_applicability_enforced() {
        // substring match against a number column
        let node = FilterNode::Leaf {
            column_id: 2,
            operator: FilterOperator::Contains,
            value: Some(serde_json::json!("5")),
        };
        assert!(compile_filter(&node, &types()).is_err());

        // range against a checkbox column
        let node = FilterNode::Leaf {
            column_id: 4,
            operator: FilterOperator::GreaterThan,
            value: Some(serde_json::json!(0)),
        };
        assert!(compile_filter(&node, &types()).is_err());

        // range against a date column is fine
        let node = FilterNode::Leaf {
            column_id: 3,
            operator: FilterOperator::Gte,
            value: Some(serde_json::json!("2024-01-01")),
        };
        assert!(compile_filter(&node, &types()).is_ok());
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let node = FilterNode::Leaf {
            column_id: 99,
            operator: FilterOperator::Equals,
            value: Some(serde_json::json!("x")),
        };
        assert!(compile_filter(&node, &types()).is_err());
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let node = FilterNode::from_config(&serde_json::json!({
            "functionName": "or",
            "args": [
                {"functionName": "equals", "args": [1, "x"]},
                {"functionName": "gt", "args": [2, 5]}
            ]
        }))
        .unwrap();
        let first = render(compile_filter(&node, &types()).unwrap());
        let second = render(compile_filter(&node, &types()).unwrap());
        assert_eq!(first, second);
    }
}
