use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::QueryError;
use crate::query::Cursor;
use crate::server::app::AppState;
use crate::services::{HydratedRow, RowQueryService, DEFAULT_PAGE_SIZE};

use super::query_error_status;

#[derive(Deserialize)]
pub struct ListRowsParams {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowPageResponse {
    pub rows: Vec<HydratedRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// The paginated row stream of a view: filtered, sorted and hydrated, with
/// an opaque continuation token while more rows remain
pub async fn list_view_rows(
    State(state): State<AppState>,
    Path(view_id): Path<i32>,
    Query(params): Query<ListRowsParams>,
) -> Result<Json<RowPageResponse>, (StatusCode, Json<serde_json::Value>)> {
    let cursor = params
        .cursor
        .as_deref()
        .map(Cursor::decode)
        .transpose()
        .map_err(error_response)?;
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let service = RowQueryService::new(state.db.clone());
    let page = service
        .fetch_page(view_id, limit, cursor)
        .await
        .map_err(error_response)?;

    Ok(Json(RowPageResponse {
        rows: page.rows,
        next_cursor: page.next_cursor.map(|c| c.encode()),
    }))
}

fn error_response(err: QueryError) -> (StatusCode, Json<serde_json::Value>) {
    (
        query_error_status(&err),
        Json(serde_json::json!({ "error": err.to_string() })),
    )
}
