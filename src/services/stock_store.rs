//! Stock price record store
//!
//! `StockStore` is the persistence seam used by the handlers and the
//! ingestion service. `SeaOrmStockStore` runs against any SeaORM connection,
//! so the same code serves the pooled connection and a request transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr,
};

use crate::entities::{prelude::StockPrices, stock_prices};
use crate::models::stock::StockRecord;
use crate::services::pagination::PageWindow;

/// Inclusive date bounds; `None` leaves that side open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, String> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(format!(
                    "dateFrom ({}) must not be after dateTo ({})",
                    from, to
                ));
            }
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(from) = self.from {
            condition = condition.add(stock_prices::Column::Date.gte(from));
        }
        if let Some(to) = self.to {
            condition = condition.add(stock_prices::Column::Date.lte(to));
        }
        condition
    }
}

/// Result of a single insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The database rejected the row on its uniqueness constraint
    Conflict,
}

#[async_trait]
pub trait StockStore: Send + Sync {
    /// All records in range, ascending by date
    async fn find_by_date_range(&self, range: &DateRange) -> Result<Vec<StockRecord>, DbErr>;

    /// One window of the records in range, ascending by date
    async fn find_page(
        &self,
        range: &DateRange,
        window: PageWindow,
    ) -> Result<Vec<StockRecord>, DbErr>;

    async fn count(&self, range: &DateRange) -> Result<u64, DbErr>;

    async fn count_all(&self) -> Result<u64, DbErr> {
        self.count(&DateRange::default()).await
    }

    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool, DbErr>;

    async fn insert(&self, record: &StockRecord) -> Result<InsertOutcome, DbErr>;
}

/// `StockStore` backed by a SeaORM connection or transaction
pub struct SeaOrmStockStore<'c, C> {
    conn: &'c C,
}

impl<'c, C> SeaOrmStockStore<'c, C>
where
    C: ConnectionTrait,
{
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<'c, C> StockStore for SeaOrmStockStore<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_date_range(&self, range: &DateRange) -> Result<Vec<StockRecord>, DbErr> {
        let rows = StockPrices::find()
            .filter(range.condition())
            .order_by_asc(stock_prices::Column::Date)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(StockRecord::from).collect())
    }

    async fn find_page(
        &self,
        range: &DateRange,
        window: PageWindow,
    ) -> Result<Vec<StockRecord>, DbErr> {
        let rows = StockPrices::find()
            .filter(range.condition())
            .order_by_asc(stock_prices::Column::Date)
            .offset(window.offset)
            .limit(window.limit)
            .all(self.conn)
            .await?;

        Ok(rows.into_iter().map(StockRecord::from).collect())
    }

    async fn count(&self, range: &DateRange) -> Result<u64, DbErr> {
        StockPrices::find()
            .filter(range.condition())
            .count(self.conn)
            .await
    }

    async fn exists_by_date(&self, date: NaiveDate) -> Result<bool, DbErr> {
        let existing = StockPrices::find_by_id(date).one(self.conn).await?;
        Ok(existing.is_some())
    }

    async fn insert(&self, record: &StockRecord) -> Result<InsertOutcome, DbErr> {
        match StockPrices::insert(record.to_active_model())
            .exec_without_returning(self.conn)
            .await
        {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(e),
        }
    }
}
