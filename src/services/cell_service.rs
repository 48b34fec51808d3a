//! Cell writes: atomic upsert keyed on (row, column)
//!
//! A cell write validates that the row and column belong to the same table,
//! normalizes the incoming JSON scalar per the column type, and inserts with
//! `ON CONFLICT (row_id, column_id) DO UPDATE`. Together with the unique
//! index this keeps the one-cell-per-pair invariant even under concurrent
//! writers to the same pair.

use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::database::entities::{cells, columns, rows};
use crate::errors::{TableError, TableResult};

#[derive(Clone)]
pub struct CellService {
    db: DatabaseConnection,
}

impl CellService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Set (or overwrite) the value of one cell. A JSON null stores an
    /// explicit NULL, which reads as empty.
    pub async fn set_cell(
        &self,
        row_id: i32,
        column_id: i32,
        value: serde_json::Value,
    ) -> TableResult<cells::Model> {
        let row = rows::Entity::find_by_id(row_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::RowNotFound(row_id))?;
        let column = columns::Entity::find_by_id(column_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::ColumnNotFound(column_id))?;
        if column.table_id != row.table_id {
            return Err(TableError::ColumnTableMismatch {
                column_id,
                table_id: row.table_id,
            });
        }
        let column_type = column.get_column_type().ok_or_else(|| {
            TableError::InvalidValue(format!(
                "column {} has unknown type '{}'",
                column_id, column.column_type
            ))
        })?;
        let normalized = column_type
            .normalize_value(&value)
            .map_err(TableError::InvalidValue)?;

        let cell = cells::ActiveModel {
            table_id: Set(row.table_id),
            row_id: Set(row_id),
            column_id: Set(column_id),
            value: Set(normalized),
            ..Default::default()
        };
        cells::Entity::insert(cell)
            .on_conflict(
                OnConflict::columns([cells::Column::RowId, cells::Column::ColumnId])
                    .update_columns([cells::Column::Value])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        // Re-read: the insert result's id is not meaningful on conflict-update
        cells::Entity::find()
            .filter(cells::Column::RowId.eq(row_id))
            .filter(cells::Column::ColumnId.eq(column_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                TableError::Database(sea_orm::DbErr::RecordNotFound(format!(
                    "cell ({}, {}) missing after upsert",
                    row_id, column_id
                )))
            })
    }

    /// Remove a cell record entirely, returning the row/column pair to the
    /// never-written state. Idempotent.
    pub async fn clear_cell(&self, row_id: i32, column_id: i32) -> TableResult<()> {
        cells::Entity::delete_many()
            .filter(cells::Column::RowId.eq(row_id))
            .filter(cells::Column::ColumnId.eq(column_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
