use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{bases, cells, health, rows, views};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { db };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin: {}", e))?,
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any)
            .allow_credentials(false),
    };

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health::health_check))
        // Bases and tables
        .route("/api/bases", post(bases::create_base).get(bases::list_bases))
        .route("/api/bases/:base_id", axum::routing::delete(bases::delete_base))
        .route(
            "/api/bases/:base_id/tables",
            post(bases::create_table).get(bases::list_tables),
        )
        .route(
            "/api/tables/:table_id",
            axum::routing::delete(bases::delete_table),
        )
        // Columns and rows
        .route(
            "/api/tables/:table_id/columns",
            post(bases::create_column).get(bases::list_columns),
        )
        .route(
            "/api/columns/:column_id",
            put(bases::rename_column).delete(bases::delete_column),
        )
        .route("/api/tables/:table_id/rows", post(bases::create_row))
        .route("/api/rows/:row_id", axum::routing::delete(bases::delete_row))
        // Cells
        .route(
            "/api/rows/:row_id/cells/:column_id",
            put(cells::set_cell).delete(cells::clear_cell),
        )
        // Views and the paginated row stream
        .route(
            "/api/tables/:table_id/views",
            post(views::create_view).get(views::list_views),
        )
        .route(
            "/api/views/:view_id",
            get(views::get_view).delete(views::delete_view),
        )
        .route("/api/views/:view_id/config", put(views::update_config))
        .route("/api/views/:view_id/rows", get(rows::list_view_rows))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}
