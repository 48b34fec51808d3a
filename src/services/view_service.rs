//! View CRUD and configuration validation
//!
//! Configuration writes validate the whole blob against the table's current
//! columns before persisting: the filter tree must parse and type-check, the
//! sort list and hidden-column list must reference existing columns. Stored
//! configs are therefore well-formed at rest; the query engine still
//! re-validates on read since columns can be deleted after a config was
//! saved.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::database::entities::{columns, tables, views};
use crate::errors::{QueryError, QueryResult};
use crate::query::{compile_filter, resolve_sort_keys, ColumnTypeMap, FilterNode, ViewConfig};

#[derive(Clone)]
pub struct ViewService {
    db: DatabaseConnection,
}

impl ViewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_view(&self, table_id: i32, name: String) -> QueryResult<views::Model> {
        tables::Entity::find_by_id(table_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| QueryError::Validation(format!("table {} not found", table_id)))?;
        let now = chrono::Utc::now();
        let view = views::ActiveModel {
            table_id: Set(table_id),
            name: Set(name),
            config: Set(ViewConfig::default().to_json()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(view.insert(&self.db).await?)
    }

    pub async fn list_views(&self, table_id: i32) -> QueryResult<Vec<views::Model>> {
        Ok(views::Entity::find()
            .filter(views::Column::TableId.eq(table_id))
            .order_by_asc(views::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_view(&self, view_id: i32) -> QueryResult<views::Model> {
        views::Entity::find_by_id(view_id)
            .one(&self.db)
            .await?
            .ok_or(QueryError::ViewNotFound(view_id))
    }

    pub async fn delete_view(&self, view_id: i32) -> QueryResult<()> {
        let view = self.get_view(view_id).await?;
        views::Entity::delete_by_id(view.id).exec(&self.db).await?;
        Ok(())
    }

    /// Replace a view's configuration after validating it against the
    /// table's columns
    pub async fn update_config(
        &self,
        view_id: i32,
        config: serde_json::Value,
    ) -> QueryResult<views::Model> {
        let view = self.get_view(view_id).await?;
        let config: ViewConfig = serde_json::from_value(config)
            .map_err(|e| QueryError::Validation(format!("malformed view config: {}", e)))?;

        let table_columns = columns::Entity::find()
            .filter(columns::Column::TableId.eq(view.table_id))
            .all(&self.db)
            .await?;
        let mut types = ColumnTypeMap::new();
        for column in &table_columns {
            if let Some(column_type) = column.get_column_type() {
                types.insert(column.id, column_type);
            }
        }

        if let Some(filters) = &config.filters {
            let node = FilterNode::from_config(filters)?;
            compile_filter(&node, &types)?;
        }
        resolve_sort_keys(&config.sorting, &types)?;
        for column_id in &config.hidden_columns {
            if !types.contains_key(column_id) {
                return Err(QueryError::Validation(format!(
                    "hidden column {} does not exist",
                    column_id
                )));
            }
        }

        let mut active: views::ActiveModel = view.into();
        active.config = Set(config.to_json());
        active.updated_at = Set(chrono::Utc::now());
        Ok(active.update(&self.db).await?)
    }
}
