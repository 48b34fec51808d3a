use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::database::entities::cells;
use crate::server::app::AppState;
use crate::services::CellService;

use super::table_error_status;

#[derive(Serialize, Deserialize)]
pub struct SetCellRequest {
    pub value: serde_json::Value,
}

pub async fn set_cell(
    State(state): State<AppState>,
    Path((row_id, column_id)): Path<(i32, i32)>,
    Json(payload): Json<SetCellRequest>,
) -> Result<Json<cells::Model>, StatusCode> {
    let service = CellService::new(state.db.clone());
    let cell = service
        .set_cell(row_id, column_id, payload.value)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(cell))
}

pub async fn clear_cell(
    State(state): State<AppState>,
    Path((row_id, column_id)): Path<(i32, i32)>,
) -> Result<StatusCode, StatusCode> {
    let service = CellService::new(state.db.clone());
    service
        .clear_cell(row_id, column_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
