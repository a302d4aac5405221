// `&SchemaManager<'_>` cannot be spelled out here: the explicit lifetime
// conflicts with the `#[async_trait]`-desugared `MigrationTrait` signature.
#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_master_tables::Migration),
            Box::new(m20240101_000002_create_recipe_tables::Migration),
            Box::new(m20240101_000003_create_transaction_tables::Migration),
            Box::new(m20240101_000004_create_stock_movements_table::Migration),
            Box::new(m20240101_000005_create_accounting_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_master_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_master_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(FinancialYears::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FinancialYears::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FinancialYears::Name).string().not_null())
                        .col(
                            ColumnDef::new(FinancialYears::StartDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FinancialYears::EndDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(FinancialYears::Locked).boolean().not_null())
                        .col(ColumnDef::new(FinancialYears::Status).boolean().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::Status).boolean().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Ledgers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Ledgers::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Ledgers::Name).string().not_null())
                        .col(ColumnDef::new(Ledgers::LocationId).big_integer())
                        .col(ColumnDef::new(Ledgers::Status).boolean().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Ledgers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(FinancialYears::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum FinancialYears {
        Table,
        Id,
        Name,
        StartDate,
        EndDate,
        Locked,
        Status,
    }

    #[derive(Iden)]
    enum Locations {
        Table,
        Id,
        Name,
        Status,
    }

    #[derive(Iden)]
    enum Ledgers {
        Table,
        Id,
        Name,
        LocationId,
        Status,
    }
}

mod m20240101_000002_create_recipe_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_recipe_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Recipes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Recipes::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Recipes::ProductId).big_integer().not_null())
                        .col(ColumnDef::new(Recipes::Status).boolean().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RecipeLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RecipeLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RecipeLines::RecipeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RecipeLines::RawMaterialId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RecipeLines::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_recipe_lines_recipe")
                                .from(RecipeLines::Table, RecipeLines::RecipeId)
                                .to(Recipes::Table, Recipes::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RecipeLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Recipes::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Recipes {
        Table,
        Id,
        ProductId,
        Status,
    }

    #[derive(Iden)]
    enum RecipeLines {
        Table,
        Id,
        RecipeId,
        RawMaterialId,
        Quantity,
    }
}

mod m20240101_000003_create_transaction_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_transaction_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Transactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Transactions::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::Kind).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Transactions::TransactionNo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TransactionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::LocationId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::CompanyId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::FinancialYearId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::PartyLedgerId).big_integer())
                        .col(ColumnDef::new(Transactions::OrderId).big_integer())
                        .col(ColumnDef::new(Transactions::FulfilledById).big_integer())
                        .col(
                            ColumnDef::new(Transactions::BaseTotal)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::DiscountTotal)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TaxTotal)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::TotalAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::CashAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::CardAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::UpiAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Transactions::Status).boolean().not_null())
                        .col(ColumnDef::new(Transactions::CreatedBy).string())
                        .col(ColumnDef::new(Transactions::LastModifiedBy).string())
                        .col(
                            ColumnDef::new(Transactions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Transactions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_transactions_scope")
                        .table(Transactions::Table)
                        .col(Transactions::Kind)
                        .col(Transactions::FinancialYearId)
                        .col(Transactions::LocationId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(TransactionLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TransactionLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::ItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::Rate)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::DiscountAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::CgstAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::SgstAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::Total)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::NetRate)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(TransactionLines::Status)
                                .boolean()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_transaction_lines_transaction")
                                .from(TransactionLines::Table, TransactionLines::TransactionId)
                                .to(Transactions::Table, Transactions::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_transaction_lines_master")
                        .table(TransactionLines::Table)
                        .col(TransactionLines::TransactionId)
                        .col(TransactionLines::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TransactionLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Transactions::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Transactions {
        Table,
        Id,
        Kind,
        TransactionNo,
        TransactionDate,
        LocationId,
        CompanyId,
        FinancialYearId,
        PartyLedgerId,
        OrderId,
        FulfilledById,
        BaseTotal,
        DiscountTotal,
        TaxTotal,
        TotalAmount,
        CashAmount,
        CardAmount,
        UpiAmount,
        Status,
        CreatedBy,
        LastModifiedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum TransactionLines {
        Table,
        Id,
        TransactionId,
        ItemId,
        Quantity,
        Rate,
        DiscountAmount,
        CgstAmount,
        SgstAmount,
        Total,
        NetRate,
        Status,
    }
}

mod m20240101_000004_create_stock_movements_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_stock_movements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::ItemId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::Quantity)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MovementType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::TransactionId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::TransactionNo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::TransactionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::LocationId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::NetRate).decimal_len(16, 4))
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_movements_generation")
                        .table(StockMovements::Table)
                        .col(StockMovements::MovementType)
                        .col(StockMovements::TransactionId)
                        .col(StockMovements::LocationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum StockMovements {
        Table,
        Id,
        ItemId,
        Quantity,
        MovementType,
        TransactionId,
        TransactionNo,
        TransactionDate,
        LocationId,
        NetRate,
    }
}

mod m20240101_000005_create_accounting_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_accounting_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Accounting::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Accounting::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounting::VoucherId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounting::ReferenceId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounting::ReferenceNo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounting::FinancialYearId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Accounting::TransactionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Accounting::Status).boolean().not_null())
                        .col(
                            ColumnDef::new(Accounting::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_accounting_reference")
                        .table(Accounting::Table)
                        .col(Accounting::VoucherId)
                        .col(Accounting::ReferenceId)
                        .col(Accounting::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(AccountingLines::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AccountingLines::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccountingLines::AccountingId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AccountingLines::LedgerId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(AccountingLines::Debit).decimal_len(16, 4))
                        .col(ColumnDef::new(AccountingLines::Credit).decimal_len(16, 4))
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_accounting_lines_accounting")
                                .from(AccountingLines::Table, AccountingLines::AccountingId)
                                .to(Accounting::Table, Accounting::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AccountingLines::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Accounting::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Accounting {
        Table,
        Id,
        VoucherId,
        ReferenceId,
        ReferenceNo,
        FinancialYearId,
        TransactionDate,
        Status,
        CreatedAt,
    }

    #[derive(Iden)]
    enum AccountingLines {
        Table,
        Id,
        AccountingId,
        LedgerId,
        Debit,
        Credit,
    }
}
