use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::database::entities::common_types::ColumnType;
use crate::database::entities::{bases, columns, rows, tables};
use crate::server::app::AppState;
use crate::services::TableService;

use super::table_error_status;

#[derive(Serialize, Deserialize)]
pub struct CreateBaseRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateTableRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateColumnRequest {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Serialize, Deserialize)]
pub struct RenameColumnRequest {
    pub name: String,
}

pub async fn create_base(
    State(state): State<AppState>,
    Json(payload): Json<CreateBaseRequest>,
) -> Result<Json<bases::Model>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let base = service
        .create_base(payload.name)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(base))
}

pub async fn list_bases(
    State(state): State<AppState>,
) -> Result<Json<Vec<bases::Model>>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let bases = service
        .list_bases()
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(bases))
}

pub async fn delete_base(
    State(state): State<AppState>,
    Path(base_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = TableService::new(state.db.clone());
    service
        .delete_base(base_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_table(
    State(state): State<AppState>,
    Path(base_id): Path<i32>,
    Json(payload): Json<CreateTableRequest>,
) -> Result<Json<tables::Model>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let table = service
        .create_table(base_id, payload.name)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(table))
}

pub async fn list_tables(
    State(state): State<AppState>,
    Path(base_id): Path<i32>,
) -> Result<Json<Vec<tables::Model>>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let tables = service
        .list_tables(base_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(tables))
}

pub async fn delete_table(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = TableService::new(state.db.clone());
    service
        .delete_table(table_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_column(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
    Json(payload): Json<CreateColumnRequest>,
) -> Result<Json<columns::Model>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let column = service
        .add_column(table_id, payload.name, payload.column_type)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(column))
}

pub async fn list_columns(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
) -> Result<Json<Vec<columns::Model>>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let columns = service
        .list_columns(table_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(columns))
}

pub async fn rename_column(
    State(state): State<AppState>,
    Path(column_id): Path<i32>,
    Json(payload): Json<RenameColumnRequest>,
) -> Result<Json<columns::Model>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let column = service
        .rename_column(column_id, payload.name)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(column))
}

pub async fn delete_column(
    State(state): State<AppState>,
    Path(column_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = TableService::new(state.db.clone());
    service
        .delete_column(column_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_row(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
) -> Result<Json<rows::Model>, StatusCode> {
    let service = TableService::new(state.db.clone());
    let row = service
        .create_row(table_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(Json(row))
}

pub async fn delete_row(
    State(state): State<AppState>,
    Path(row_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = TableService::new(state.db.clone());
    service
        .delete_row(row_id)
        .await
        .map_err(|e| table_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}
