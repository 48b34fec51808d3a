//! Error types for base/table/column/row/cell mutations

use thiserror::Error;

/// Errors from the table CRUD and cell write services
#[derive(Error, Debug)]
pub enum TableError {
    /// Base not found by ID
    #[error("Base {0} not found")]
    BaseNotFound(i32),

    /// Table not found by ID
    #[error("Table {0} not found")]
    TableNotFound(i32),

    /// Column not found by ID
    #[error("Column {0} not found")]
    ColumnNotFound(i32),

    /// Row not found by ID
    #[error("Row {0} not found")]
    RowNotFound(i32),

    /// Column and row belong to different tables
    #[error("Column {column_id} does not belong to table {table_id}")]
    ColumnTableMismatch { column_id: i32, table_id: i32 },

    /// Cell value does not fit the column type
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
