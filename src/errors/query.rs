//! Error types for view query construction and execution

use thiserror::Error;

/// Errors from the filter compiler, cursor codec and page-fetch engine
#[derive(Error, Debug)]
pub enum QueryError {
    /// View not found by ID
    #[error("View {0} not found")]
    ViewNotFound(i32),

    /// Malformed filter tree, sort list or stored view config
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Cursor does not match the view's current sort configuration
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl QueryError {
    /// True for errors the caller can fix by correcting the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Validation(_) | QueryError::InvalidCursor(_))
    }
}
