//! CRUD over bases, tables, columns and rows
//!
//! Thin mutations with existence checks; structural deletes cascade through
//! the schema's foreign keys.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::database::entities::common_types::ColumnType;
use crate::database::entities::{bases, columns, rows, tables};
use crate::errors::{TableError, TableResult};

#[derive(Clone)]
pub struct TableService {
    db: DatabaseConnection,
}

impl TableService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_base(&self, name: String) -> TableResult<bases::Model> {
        let now = chrono::Utc::now();
        let base = bases::ActiveModel {
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(base.insert(&self.db).await?)
    }

    pub async fn list_bases(&self) -> TableResult<Vec<bases::Model>> {
        Ok(bases::Entity::find()
            .order_by_asc(bases::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn delete_base(&self, base_id: i32) -> TableResult<()> {
        let base = bases::Entity::find_by_id(base_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::BaseNotFound(base_id))?;
        bases::Entity::delete_by_id(base.id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn create_table(&self, base_id: i32, name: String) -> TableResult<tables::Model> {
        bases::Entity::find_by_id(base_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::BaseNotFound(base_id))?;
        let now = chrono::Utc::now();
        let table = tables::ActiveModel {
            base_id: Set(base_id),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        Ok(table.insert(&self.db).await?)
    }

    pub async fn list_tables(&self, base_id: i32) -> TableResult<Vec<tables::Model>> {
        bases::Entity::find_by_id(base_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::BaseNotFound(base_id))?;
        Ok(tables::Entity::find()
            .filter(tables::Column::BaseId.eq(base_id))
            .order_by_asc(tables::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn get_table(&self, table_id: i32) -> TableResult<tables::Model> {
        tables::Entity::find_by_id(table_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::TableNotFound(table_id))
    }

    pub async fn delete_table(&self, table_id: i32) -> TableResult<()> {
        let table = self.get_table(table_id).await?;
        tables::Entity::delete_by_id(table.id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn add_column(
        &self,
        table_id: i32,
        name: String,
        column_type: ColumnType,
    ) -> TableResult<columns::Model> {
        self.get_table(table_id).await?;
        // Append after the current highest display position
        let last = columns::Entity::find()
            .filter(columns::Column::TableId.eq(table_id))
            .order_by_desc(columns::Column::OrderIndex)
            .limit(1)
            .one(&self.db)
            .await?;
        let order_index = last.map(|c| c.order_index + 1).unwrap_or(0);
        let column = columns::ActiveModel {
            table_id: Set(table_id),
            name: Set(name),
            column_type: Set(column_type.as_ref().to_string()),
            order_index: Set(order_index),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        Ok(column.insert(&self.db).await?)
    }

    pub async fn list_columns(&self, table_id: i32) -> TableResult<Vec<columns::Model>> {
        self.get_table(table_id).await?;
        Ok(columns::Entity::find()
            .filter(columns::Column::TableId.eq(table_id))
            .order_by_asc(columns::Column::OrderIndex)
            .order_by_asc(columns::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn rename_column(&self, column_id: i32, name: String) -> TableResult<columns::Model> {
        let column = columns::Entity::find_by_id(column_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::ColumnNotFound(column_id))?;
        let mut active: columns::ActiveModel = column.into();
        active.name = Set(name);
        Ok(active.update(&self.db).await?)
    }

    pub async fn delete_column(&self, column_id: i32) -> TableResult<()> {
        let column = columns::Entity::find_by_id(column_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::ColumnNotFound(column_id))?;
        columns::Entity::delete_by_id(column.id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn create_row(&self, table_id: i32) -> TableResult<rows::Model> {
        self.get_table(table_id).await?;
        let row = rows::ActiveModel {
            table_id: Set(table_id),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };
        Ok(row.insert(&self.db).await?)
    }

    pub async fn delete_row(&self, row_id: i32) -> TableResult<()> {
        let row = rows::Entity::find_by_id(row_id)
            .one(&self.db)
            .await?
            .ok_or(TableError::RowNotFound(row_id))?;
        rows::Entity::delete_by_id(row.id).exec(&self.db).await?;
        Ok(())
    }
}
