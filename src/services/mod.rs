pub mod cell_service;
pub mod row_query_service;
pub mod table_service;
pub mod view_service;

pub use cell_service::CellService;
pub use row_query_service::{HydratedRow, RowPage, RowQueryService, DEFAULT_PAGE_SIZE};
pub use table_service::TableService;
pub use view_service::ViewService;
