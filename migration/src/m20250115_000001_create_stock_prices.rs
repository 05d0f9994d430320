use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StockPrices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockPrices::Date)
                            .date()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockPrices::Open).double().not_null())
                    .col(ColumnDef::new(StockPrices::High).double().not_null())
                    .col(ColumnDef::new(StockPrices::Low).double().not_null())
                    .col(ColumnDef::new(StockPrices::Close).double().not_null())
                    .col(ColumnDef::new(StockPrices::AdjClose).double().not_null())
                    .col(
                        ColumnDef::new(StockPrices::Volume)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(StockPrices::Volume).gte(0)),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StockPrices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StockPrices {
    Table,
    Date,
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}
