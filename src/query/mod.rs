//! View query construction: filter compilation, sort-key resolution and
//! keyset-pagination cursors over the EAV cell store
//!
//! These modules are pure query builders; execution and row hydration live
//! in [`crate::services::RowQueryService`].

pub mod config;
pub mod cursor;
pub mod filter;
pub mod sort;

pub use config::{SortDirection, SortSpec, ViewConfig};
pub use cursor::{boundary_condition, Cursor, CursorVal};
pub use filter::{compile_filter, BoolOp, ColumnTypeMap, FilterNode, FilterOperator};
pub use sort::{apply_order, join_sort_keys, resolve_sort_keys, SortKey};
