use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::database::entities::views;
use crate::server::app::AppState;
use crate::services::ViewService;

use super::query_error_status;

#[derive(Serialize, Deserialize)]
pub struct CreateViewRequest {
    pub name: String,
}

pub async fn create_view(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
    Json(payload): Json<CreateViewRequest>,
) -> Result<Json<views::Model>, StatusCode> {
    let service = ViewService::new(state.db.clone());
    let view = service
        .create_view(table_id, payload.name)
        .await
        .map_err(|e| query_error_status(&e))?;
    Ok(Json(view))
}

pub async fn list_views(
    State(state): State<AppState>,
    Path(table_id): Path<i32>,
) -> Result<Json<Vec<views::Model>>, StatusCode> {
    let service = ViewService::new(state.db.clone());
    let views = service
        .list_views(table_id)
        .await
        .map_err(|e| query_error_status(&e))?;
    Ok(Json(views))
}

pub async fn get_view(
    State(state): State<AppState>,
    Path(view_id): Path<i32>,
) -> Result<Json<views::Model>, StatusCode> {
    let service = ViewService::new(state.db.clone());
    let view = service
        .get_view(view_id)
        .await
        .map_err(|e| query_error_status(&e))?;
    Ok(Json(view))
}

pub async fn delete_view(
    State(state): State<AppState>,
    Path(view_id): Path<i32>,
) -> Result<StatusCode, StatusCode> {
    let service = ViewService::new(state.db.clone());
    service
        .delete_view(view_id)
        .await
        .map_err(|e| query_error_status(&e))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_config(
    State(state): State<AppState>,
    Path(view_id): Path<i32>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<views::Model>, StatusCode> {
    let service = ViewService::new(state.db.clone());
    let view = service
        .update_config(view_id, payload)
        .await
        .map_err(|e| query_error_status(&e))?;
    Ok(Json(view))
}
