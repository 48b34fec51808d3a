use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cell: the EAV fact table, one record per (row, column) value
///
/// `value` is the scalar normalized to text at write time (see
/// [`super::common_types::ColumnType::normalize_value`]). SQL NULL means the
/// value was explicitly cleared; an absent record means it was never written.
/// At most one cell exists per (row_id, column_id) pair, enforced by a unique
/// index and upsert writes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "cells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub table_id: i32,
    pub row_id: i32,
    pub column_id: i32,
    pub value: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tables::Entity",
        from = "Column::TableId",
        to = "super::tables::Column::Id"
    )]
    Tables,
    #[sea_orm(
        belongs_to = "super::rows::Entity",
        from = "Column::RowId",
        to = "super::rows::Column::Id"
    )]
    Rows,
    #[sea_orm(
        belongs_to = "super::columns::Entity",
        from = "Column::ColumnId",
        to = "super::columns::Column::Id"
    )]
    Columns,
}

impl Related<super::tables::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tables.def()
    }
}

impl Related<super::rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl Related<super::columns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Columns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
