use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Branches {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Inventories {
    Table,
    Id,
    ProductId,
    BranchId,
    Quantity,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum InventoryMovements {
    Table,
    Id,
    ProductId,
    BranchId,
    MovementType,
    Quantity,
    BalanceAfter,
    Reference,
    Note,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum StockRules {
    Table,
    Id,
    ProductId,
    BranchId,
    MinBoxes,
    MinPieces,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Stock is kept in pieces; boxes are derived from `products.units_per_box`.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inventories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inventories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inventories::ProductId).integer().not_null())
                    .col(ColumnDef::new(Inventories::BranchId).integer().not_null())
                    .col(ColumnDef::new(Inventories::Quantity).integer().not_null().default(0))
                    .col(ColumnDef::new(Inventories::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_product")
                            .from(Inventories::Table, Inventories::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventories_branch")
                            .from(Inventories::Table, Inventories::BranchId)
                            .to(Branches::Table, Branches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventories_product_branch")
                    .table(Inventories::Table)
                    .col(Inventories::ProductId)
                    .col(Inventories::BranchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InventoryMovements::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InventoryMovements::ProductId).integer().not_null())
                    .col(ColumnDef::new(InventoryMovements::BranchId).integer().not_null())
                    .col(ColumnDef::new(InventoryMovements::MovementType).string_len(16).not_null())
                    .col(ColumnDef::new(InventoryMovements::Quantity).integer().not_null())
                    .col(ColumnDef::new(InventoryMovements::BalanceAfter).integer().not_null())
                    .col(ColumnDef::new(InventoryMovements::Reference).string_len(64).null())
                    .col(ColumnDef::new(InventoryMovements::Note).text().null())
                    .col(ColumnDef::new(InventoryMovements::UserId).integer().null())
                    .col(
                        ColumnDef::new(InventoryMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_inventory_movements_product_branch")
                    .table(InventoryMovements::Table)
                    .col(InventoryMovements::ProductId)
                    .col(InventoryMovements::BranchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StockRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockRules::ProductId).integer().not_null())
                    .col(ColumnDef::new(StockRules::BranchId).integer().not_null())
                    .col(ColumnDef::new(StockRules::MinBoxes).integer().not_null().default(0))
                    .col(ColumnDef::new(StockRules::MinPieces).integer().not_null().default(0))
                    .col(ColumnDef::new(StockRules::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(StockRules::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(StockRules::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stock_rules_product")
                            .from(StockRules::Table, StockRules::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stock_rules_product_branch")
                    .table(StockRules::Table)
                    .col(StockRules::ProductId)
                    .col(StockRules::BranchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(StockRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(InventoryMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Inventories::Table).to_owned())
            .await?;
        Ok(())
    }
}
