pub mod bases;
pub mod cells;
pub mod health;
pub mod rows;
pub mod views;

use axum::http::StatusCode;

use crate::errors::{QueryError, TableError};

pub(crate) fn table_error_status(err: &TableError) -> StatusCode {
    match err {
        TableError::BaseNotFound(_)
        | TableError::TableNotFound(_)
        | TableError::ColumnNotFound(_)
        | TableError::RowNotFound(_) => StatusCode::NOT_FOUND,
        TableError::ColumnTableMismatch { .. } | TableError::InvalidValue(_) => {
            StatusCode::BAD_REQUEST
        }
        TableError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn query_error_status(err: &QueryError) -> StatusCode {
    match err {
        QueryError::ViewNotFound(_) => StatusCode::NOT_FOUND,
        QueryError::Validation(_) | QueryError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
        QueryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
