pub mod bases;
pub mod cells;
pub mod columns;
pub mod common_types;
pub mod rows;
pub mod tables;
pub mod views;
