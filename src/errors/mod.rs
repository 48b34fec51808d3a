//! Domain-specific error types
//!
//! - **QueryError**: filter compilation, cursor decoding, page fetches
//! - **TableError**: base/table/column/row/cell mutations
//!
//! Handlers map these onto HTTP status codes; everything else propagates them
//! unchanged with `?`.

pub mod query;
pub mod table;

pub use query::QueryError;
pub use table::TableError;

/// Result type alias for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for table mutations
pub type TableResult<T> = Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_alias() {
        let result: QueryResult<i32> = Err(QueryError::ViewNotFound(42));
        assert!(result.is_err());
    }

    #[test]
    fn test_client_error_classification() {
        assert!(QueryError::Validation("x".into()).is_client_error());
        assert!(QueryError::InvalidCursor("x".into()).is_client_error());
        assert!(!QueryError::ViewNotFound(1).is_client_error());
    }
}
