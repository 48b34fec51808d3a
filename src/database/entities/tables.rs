use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Table: named container of columns and rows within a base
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "tables")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub base_id: i32,
    pub name: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bases::Entity",
        from = "Column::BaseId",
        to = "super::bases::Column::Id"
    )]
    Bases,
    #[sea_orm(has_many = "super::columns::Entity")]
    Columns,
    #[sea_orm(has_many = "super::rows::Entity")]
    Rows,
    #[sea_orm(has_many = "super::views::Entity")]
    Views,
}

impl Related<super::bases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bases.def()
    }
}

impl Related<super::columns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Columns.def()
    }
}

impl Related<super::rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl Related<super::views::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Views.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
