use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use super::common_types::ColumnType;

/// Column definition for a table
///
/// `column_type` holds a [`ColumnType`] string and determines value parsing
/// and comparison semantics for filtering and sorting. `order_index` is the
/// default display order; it is not enforced unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "columns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_id: i32,
    pub name: String,
    pub column_type: String,
    pub order_index: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tables::Entity",
        from = "Column::TableId",
        to = "super::tables::Column::Id"
    )]
    Tables,
    #[sea_orm(has_many = "super::cells::Entity")]
    Cells,
}

impl Related<super::tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tables.def()
    }
}

impl Related<super::cells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Get the column type as an enum for type safety
    pub fn get_column_type(&self) -> Option<ColumnType> {
        self.column_type.parse().ok()
    }
}
