//! Sort-key resolver: per-column aliased self-joins into cell storage
//!
//! Every sort entry needs its own LEFT JOIN of the `cells` relation, pinned
//! to that entry's column, so each row gains one nullable value expression
//! per sort key. The same expression is used for ORDER BY and for the cursor
//! boundary predicate, which is what keeps keyset pagination consistent with
//! the displayed order. Rows without a cell for a sort column get NULL, and
//! NULL sorts before every value in both directions; `rows.id ASC` is always
//! appended as the final tiebreaker so the order is total.

use sea_orm::sea_query::{Alias, Expr, IntoCondition, SimpleExpr};
use sea_orm::{JoinType, QueryOrder, QuerySelect, RelationTrait, Select};

use crate::database::entities::{cells, common_types::ColumnType, rows};
use crate::errors::QueryError;
use crate::query::config::{SortDirection, SortSpec};
use crate::query::filter::ColumnTypeMap;

/// One resolved sort key: the join alias plus the value expression shared by
/// ORDER BY and cursor comparisons
#[derive(Debug, Clone)]
pub struct SortKey {
    pub column_id: i32,
    pub column_type: ColumnType,
    pub direction: SortDirection,
    pub alias: Alias,
    pub expr: SimpleExpr,
}

/// Resolve a view's sort list into join-backed sort keys.
///
/// Duplicate column ids collapse last-write-wins: the entry keeps its first
/// position but takes the direction of the latest occurrence. Unknown column
/// ids are a validation error (the stored config references a deleted
/// column).
pub fn resolve_sort_keys(
    sorting: &[SortSpec],
    types: &ColumnTypeMap,
) -> Result<Vec<SortKey>, QueryError> {
    let mut deduped: Vec<SortSpec> = Vec::with_capacity(sorting.len());
    for spec in sorting {
        match deduped.iter_mut().find(|s| s.column_id == spec.column_id) {
            Some(existing) => existing.direction = spec.direction,
            None => deduped.push(*spec),
        }
    }

    deduped
        .into_iter()
        .enumerate()
        .map(|(i, spec)| {
            let column_type = *types.get(&spec.column_id).ok_or_else(|| {
                QueryError::Validation(format!(
                    "sort references unknown column {}",
                    spec.column_id
                ))
            })?;
            let alias = Alias::new(format!("sort_cell_{}", i));
            let value = Expr::col((alias.clone(), cells::Column::Value));
            let expr: SimpleExpr = if column_type == ColumnType::Number {
                value.cast_as(Alias::new("REAL"))
            } else {
                value.into()
            };
            Ok(SortKey {
                column_id: spec.column_id,
                column_type,
                direction: spec.direction,
                alias,
                expr,
            })
        })
        .collect()
}

/// LEFT JOIN `cells AS sort_cell_<i>` once per sort key, pinned to the key's
/// column id
pub fn join_sort_keys(
    mut select: Select<rows::Entity>,
    keys: &[SortKey],
) -> Select<rows::Entity> {
    for key in keys {
        let column_id = key.column_id;
        select = select.join_as(
            JoinType::LeftJoin,
            cells::Relation::Rows
                .def()
                .rev()
                .on_condition(move |_left, right| {
                    Expr::col((right, cells::Column::ColumnId))
                        .eq(column_id)
                        .into_condition()
                }),
            key.alias.clone(),
        );
    }
    select
}

/// ORDER BY every sort key (NULLs first in both directions), then row id
pub fn apply_order(mut select: Select<rows::Entity>, keys: &[SortKey]) -> Select<rows::Entity> {
    for key in keys {
        // SQLite has no portable NULLS FIRST before 3.30; an explicit
        // null-rank term gives the same order everywhere
        select = select
            .order_by(
                Expr::expr(key.expr.clone()).is_null(),
                sea_orm::Order::Desc,
            )
            .order_by(key.expr.clone(), key.direction.into_order());
    }
    select.order_by_asc(rows::Column::Id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> ColumnTypeMap {
        let mut map = ColumnTypeMap::new();
        map.insert(1, ColumnType::SingleLineText);
        map.insert(2, ColumnType::Number);
        map
    }

    #[test]
    fn test_resolver_assigns_one_alias_per_key() {
        let keys = resolve_sort_keys(
            &[
                SortSpec {
                    column_id: 2,
                    direction: SortDirection::Desc,
                },
                SortSpec {
                    column_id: 1,
                    direction: SortDirection::Asc,
                },
            ],
            &types(),
        )
        .unwrap();
        assert_eq!(keys.len(), 2);
        {
            use sea_orm::sea_query::Iden;
            assert_ne!(keys[0].alias.to_string(), keys[1].alias.to_string());
        }
        assert_eq!(keys[0].column_id, 2);
        assert_eq!(keys[1].column_id, 1);
    }

    #[test]
    fn test_duplicate_column_is_last_write_wins() {
        let keys = resolve_sort_keys(
            &[
                SortSpec {
                    column_id: 1,
                    direction: SortDirection::Asc,
                },
                SortSpec {
                    column_id: 2,
                    direction: SortDirection::Asc,
                },
                SortSpec {
                    column_id: 1,
                    direction: SortDirection::Desc,
                },
            ],
            &types(),
        )
        .unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].column_id, 1);
        assert_eq!(keys[0].direction, SortDirection::Desc);
        assert_eq!(keys[1].column_id, 2);
    }

    #[test]
    fn test_unknown_sort_column_is_rejected() {
        let result = resolve_sort_keys(
            &[SortSpec {
                column_id: 42,
                direction: SortDirection::Asc,
            }],
            &types(),
        );
        assert!(matches!(result, Err(QueryError::Validation(_))));
    }

    #[test]
    fn test_empty_sort_list_resolves_empty() {
        assert!(resolve_sort_keys(&[], &types()).unwrap().is_empty());
    }
}
