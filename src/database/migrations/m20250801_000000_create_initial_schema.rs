use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create bases table
        manager
            .create_table(
                Table::create()
                    .table(Bases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bases::Name).string().not_null())
                    .col(ColumnDef::new(Bases::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bases::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create tables table
        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tables::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tables::BaseId).integer().not_null())
                    .col(ColumnDef::new(Tables::Name).string().not_null())
                    .col(ColumnDef::new(Tables::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Tables::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tables_base_id")
                            .from(Tables::Table, Tables::BaseId)
                            .to(Bases::Table, Bases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create columns table
        manager
            .create_table(
                Table::create()
                    .table(Columns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Columns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Columns::TableId).integer().not_null())
                    .col(ColumnDef::new(Columns::Name).string().not_null())
                    .col(ColumnDef::new(Columns::ColumnType).string().not_null())
                    .col(
                        ColumnDef::new(Columns::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Columns::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_columns_table_id")
                            .from(Columns::Table, Columns::TableId)
                            .to(Tables::Table, Tables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create rows table
        manager
            .create_table(
                Table::create()
                    .table(Rows::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rows::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rows::TableId).integer().not_null())
                    .col(ColumnDef::new(Rows::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rows_table_id")
                            .from(Rows::Table, Rows::TableId)
                            .to(Tables::Table, Tables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cells table; one cell per (row, column), enforced so that
        // concurrent upserts cannot produce duplicate cells
        manager
            .create_table(
                Table::create()
                    .table(Cells::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cells::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cells::TableId).integer().not_null())
                    .col(ColumnDef::new(Cells::RowId).integer().not_null())
                    .col(ColumnDef::new(Cells::ColumnId).integer().not_null())
                    .col(ColumnDef::new(Cells::Value).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cells_table_id")
                            .from(Cells::Table, Cells::TableId)
                            .to(Tables::Table, Tables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cells_row_id")
                            .from(Cells::Table, Cells::RowId)
                            .to(Rows::Table, Rows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cells_column_id")
                            .from(Cells::Table, Cells::ColumnId)
                            .to(Columns::Table, Columns::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .index(
                        Index::create()
                            .name("idx_cells_row_column")
                            .col(Cells::RowId)
                            .col(Cells::ColumnId)
                            .unique(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create views table
        manager
            .create_table(
                Table::create()
                    .table(Views::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Views::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Views::TableId).integer().not_null())
                    .col(ColumnDef::new(Views::Name).string().not_null())
                    .col(ColumnDef::new(Views::Config).text().not_null())
                    .col(ColumnDef::new(Views::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Views::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_views_table_id")
                            .from(Views::Table, Views::TableId)
                            .to(Tables::Table, Tables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes for better query performance
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tables_base_id")
                    .table(Tables::Table)
                    .col(Tables::BaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_columns_table_id")
                    .table(Columns::Table)
                    .col(Columns::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rows_table_id")
                    .table(Rows::Table)
                    .col(Rows::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cells_table_id")
                    .table(Cells::Table)
                    .col(Cells::TableId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_cells_row_id")
                    .table(Cells::Table)
                    .col(Cells::RowId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_views_table_id")
                    .table(Views::Table)
                    .col(Views::TableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Views::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cells::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Columns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tables::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bases::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Bases {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tables {
    Table,
    Id,
    BaseId,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Columns {
    Table,
    Id,
    TableId,
    Name,
    ColumnType,
    OrderIndex,
    CreatedAt,
}

#[derive(Iden)]
enum Rows {
    Table,
    Id,
    TableId,
    CreatedAt,
}

#[derive(Iden)]
enum Cells {
    Table,
    Id,
    TableId,
    RowId,
    ColumnId,
    Value,
}

#[derive(Iden)]
enum Views {
    Table,
    Id,
    TableId,
    Name,
    Config,
    CreatedAt,
    UpdatedAt,
}
