use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum LoyaltyWallets {
    Table,
    Id,
    CustomerId,
    TotalPoints,
    AvailablePoints,
    RedeemedPoints,
    ExpiredPoints,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LoyaltyTransactions {
    Table,
    Id,
    CustomerId,
    TransactionType,
    Points,
    OrderId,
    Description,
    ExpiresAt,
    IsExpired,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Drivers {
    Table,
    Id,
    Name,
    Phone,
    LicenseNumber,
    Vehicle,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeliveryRoutes {
    Table,
    Id,
    BranchId,
    DriverId,
    RouteDate,
    Vehicle,
    Status,
    Notes,
    StartedAt,
    CompletedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DeliveryStops {
    Table,
    Id,
    RouteId,
    OrderId,
    Sequence,
    Status,
    DeliveredAt,
    Notes,
}

#[derive(DeriveIden)]
enum CashRegisters {
    Table,
    Id,
    BranchId,
    UserId,
    Status,
    OpeningAmount,
    ExpectedAmount,
    ClosingAmount,
    Difference,
    Notes,
    OpenedAt,
    ClosedAt,
}

#[derive(DeriveIden)]
enum Expenses {
    Table,
    Id,
    BranchId,
    Category,
    Description,
    Amount,
    PaymentMethod,
    ExpenseDate,
    CashRegisterId,
    UserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
    OrderId,
    CustomerId,
    Amount,
    Method,
    Reference,
    CashRegisterId,
    UserId,
    CollectedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // loyalty
        manager
            .create_table(
                Table::create()
                    .table(LoyaltyWallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyWallets::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyWallets::CustomerId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(LoyaltyWallets::TotalPoints).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(LoyaltyWallets::AvailablePoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyWallets::RedeemedPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyWallets::ExpiredPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LoyaltyWallets::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_loyalty_wallets_customer")
                            .from(LoyaltyWallets::Table, LoyaltyWallets::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LoyaltyTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyTransactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LoyaltyTransactions::CustomerId).integer().not_null())
                    .col(
                        ColumnDef::new(LoyaltyTransactions::TransactionType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LoyaltyTransactions::Points).big_integer().not_null())
                    .col(ColumnDef::new(LoyaltyTransactions::OrderId).integer().null())
                    .col(ColumnDef::new(LoyaltyTransactions::Description).string_len(255).null())
                    .col(ColumnDef::new(LoyaltyTransactions::ExpiresAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(LoyaltyTransactions::IsExpired)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(LoyaltyTransactions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // deliveries
        manager
            .create_table(
                Table::create()
                    .table(Drivers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Drivers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Drivers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Drivers::Phone).string_len(32).null())
                    .col(ColumnDef::new(Drivers::LicenseNumber).string_len(64).null())
                    .col(ColumnDef::new(Drivers::Vehicle).string_len(128).null())
                    .col(ColumnDef::new(Drivers::IsActive).boolean().not_null().default(true))
                    .col(ColumnDef::new(Drivers::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeliveryRoutes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryRoutes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeliveryRoutes::BranchId).integer().not_null())
                    .col(ColumnDef::new(DeliveryRoutes::DriverId).integer().not_null())
                    .col(ColumnDef::new(DeliveryRoutes::RouteDate).date().not_null())
                    .col(ColumnDef::new(DeliveryRoutes::Vehicle).string_len(128).null())
                    .col(ColumnDef::new(DeliveryRoutes::Status).string_len(16).not_null())
                    .col(ColumnDef::new(DeliveryRoutes::Notes).text().null())
                    .col(ColumnDef::new(DeliveryRoutes::StartedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(DeliveryRoutes::CompletedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(DeliveryRoutes::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_routes_driver")
                            .from(DeliveryRoutes::Table, DeliveryRoutes::DriverId)
                            .to(Drivers::Table, Drivers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeliveryStops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliveryStops::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DeliveryStops::RouteId).integer().not_null())
                    .col(ColumnDef::new(DeliveryStops::OrderId).integer().not_null())
                    .col(ColumnDef::new(DeliveryStops::Sequence).integer().not_null())
                    .col(ColumnDef::new(DeliveryStops::Status).string_len(16).not_null())
                    .col(ColumnDef::new(DeliveryStops::DeliveredAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(DeliveryStops::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_stops_route")
                            .from(DeliveryStops::Table, DeliveryStops::RouteId)
                            .to(DeliveryRoutes::Table, DeliveryRoutes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_delivery_stops_order")
                            .from(DeliveryStops::Table, DeliveryStops::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // money
        manager
            .create_table(
                Table::create()
                    .table(CashRegisters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashRegisters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashRegisters::BranchId).integer().not_null())
                    .col(ColumnDef::new(CashRegisters::UserId).integer().null())
                    .col(ColumnDef::new(CashRegisters::Status).string_len(16).not_null())
                    .col(ColumnDef::new(CashRegisters::OpeningAmount).big_integer().not_null())
                    .col(ColumnDef::new(CashRegisters::ExpectedAmount).big_integer().null())
                    .col(ColumnDef::new(CashRegisters::ClosingAmount).big_integer().null())
                    .col(ColumnDef::new(CashRegisters::Difference).big_integer().null())
                    .col(ColumnDef::new(CashRegisters::Notes).text().null())
                    .col(ColumnDef::new(CashRegisters::OpenedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(CashRegisters::ClosedAt).timestamp_with_time_zone().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::BranchId).integer().not_null())
                    .col(ColumnDef::new(Expenses::Category).string_len(64).not_null())
                    .col(ColumnDef::new(Expenses::Description).string_len(512).not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::PaymentMethod).string_len(16).not_null())
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::CashRegisterId).integer().null())
                    .col(ColumnDef::new(Expenses::UserId).integer().null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_expenses_cash_register")
                            .from(Expenses::Table, Expenses::CashRegisterId)
                            .to(CashRegisters::Table, CashRegisters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Collections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Collections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Collections::OrderId).integer().not_null())
                    .col(ColumnDef::new(Collections::CustomerId).integer().not_null())
                    .col(ColumnDef::new(Collections::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Collections::Method).string_len(16).not_null())
                    .col(ColumnDef::new(Collections::Reference).string_len(128).null())
                    .col(ColumnDef::new(Collections::CashRegisterId).integer().null())
                    .col(ColumnDef::new(Collections::UserId).integer().null())
                    .col(ColumnDef::new(Collections::CollectedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collections_order")
                            .from(Collections::Table, Collections::OrderId)
                            .to(Orders::Table, Orders::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_collections_cash_register")
                            .from(Collections::Table, Collections::CashRegisterId)
                            .to(CashRegisters::Table, CashRegisters::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Collections::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(CashRegisters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(DeliveryStops::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(DeliveryRoutes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Drivers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(LoyaltyTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(LoyaltyWallets::Table).to_owned())
            .await?;
        Ok(())
    }
}
