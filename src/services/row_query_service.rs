//! Paginated view query engine
//!
//! One page fetch = one bounded row query plus one cell-hydration query.
//! The row query composes the view's table scope, the compiled filter tree,
//! the cursor boundary predicate and the resolved sort order; fetching
//! `limit + 1` rows decides whether a continuation cursor exists without
//! guessing from a short page.

use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use serde::Serialize;

use crate::database::entities::common_types::ColumnType;
use crate::database::entities::{cells, columns, rows, views};
use crate::errors::QueryError;
use crate::query::{
    apply_order, boundary_condition, compile_filter, join_sort_keys, resolve_sort_keys,
    ColumnTypeMap, Cursor, CursorVal, FilterNode, SortKey, ViewConfig,
};

/// Page size when the caller does not specify one
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// A row with its cells attached, as returned to callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HydratedRow {
    pub id: i32,
    pub table_id: i32,
    pub cells: Vec<cells::Model>,
}

/// One page of results plus the cursor for the next page, if any
#[derive(Debug, Clone)]
pub struct RowPage {
    pub rows: Vec<HydratedRow>,
    pub next_cursor: Option<Cursor>,
}

/// Read-only service executing view-configured page fetches
#[derive(Clone)]
pub struct RowQueryService {
    db: DatabaseConnection,
}

impl RowQueryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch one page of a view's rows.
    ///
    /// Stateless between calls: everything needed to resume is inside the
    /// cursor the caller round-trips. Errors surface unchanged: an unknown
    /// view, a malformed stored config, or a cursor that no longer matches
    /// the view's sort configuration (the caller should drop the cursor and
    /// restart from the first page).
    pub async fn fetch_page(
        &self,
        view_id: i32,
        limit: u64,
        cursor: Option<Cursor>,
    ) -> Result<RowPage, QueryError> {
        let view = views::Entity::find_by_id(view_id)
            .one(&self.db)
            .await?
            .ok_or(QueryError::ViewNotFound(view_id))?;
        let config = ViewConfig::from_json(&view.config)?;

        let table_columns = columns::Entity::find()
            .filter(columns::Column::TableId.eq(view.table_id))
            .all(&self.db)
            .await?;
        let mut types = ColumnTypeMap::new();
        for column in &table_columns {
            let column_type = column.get_column_type().ok_or_else(|| {
                QueryError::Validation(format!(
                    "column {} has unknown type '{}'",
                    column.id, column.column_type
                ))
            })?;
            types.insert(column.id, column_type);
        }

        let filter = config
            .filters
            .as_ref()
            .map(FilterNode::from_config)
            .transpose()?;
        let keys = resolve_sort_keys(&config.sorting, &types)?;

        let mut select = rows::Entity::find().filter(rows::Column::TableId.eq(view.table_id));
        select = join_sort_keys(select, &keys);
        if let Some(node) = &filter {
            select = select.filter(compile_filter(node, &types)?);
        }
        if let Some(cursor) = &cursor {
            select = select.filter(boundary_condition(cursor, &keys)?);
        }
        select = apply_order(select, &keys);

        let mut fetched = select.limit(limit + 1).all(&self.db).await?;
        let has_more = fetched.len() as u64 > limit;
        if has_more {
            fetched.truncate(limit as usize);
        }

        let row_ids: Vec<i32> = fetched.iter().map(|row| row.id).collect();
        let mut cells_by_row: HashMap<i32, Vec<cells::Model>> = HashMap::new();
        if !row_ids.is_empty() {
            let page_cells = cells::Entity::find()
                .filter(cells::Column::RowId.is_in(row_ids))
                .all(&self.db)
                .await?;
            for cell in page_cells {
                cells_by_row.entry(cell.row_id).or_default().push(cell);
            }
        }

        let hydrated: Vec<HydratedRow> = fetched
            .iter()
            .map(|row| {
                let mut row_cells = cells_by_row.remove(&row.id).unwrap_or_default();
                row_cells.sort_by_key(|cell| cell.column_id);
                HydratedRow {
                    id: row.id,
                    table_id: row.table_id,
                    cells: row_cells,
                }
            })
            .collect();

        let next_cursor = if has_more {
            hydrated.last().map(|last| next_cursor_from_row(last, &keys))
        } else {
            None
        };

        Ok(RowPage {
            rows: hydrated,
            next_cursor,
        })
    }
}

/// Build the continuation cursor from the last row of a full page, encoding
/// each sort key's value exactly as the boundary predicate will compare it
fn next_cursor_from_row(last: &HydratedRow, keys: &[SortKey]) -> Cursor {
    let cursor_vals = keys
        .iter()
        .map(|key| {
            let stored = last
                .cells
                .iter()
                .find(|cell| cell.column_id == key.column_id)
                .and_then(|cell| cell.value.clone());
            let value = stored.and_then(|text| match key.column_type {
                ColumnType::Number => text.parse::<f64>().ok().map(|f| serde_json::json!(f)),
                _ => Some(serde_json::Value::String(text)),
            });
            CursorVal {
                col_id: key.column_id,
                value,
                direction: key.direction,
            }
        })
        .collect();
    Cursor {
        row_id: last.id,
        cursor_vals,
    }
}
