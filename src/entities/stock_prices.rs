//! `SeaORM` Entity for the stock_prices table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One trading day. `date` is the primary key, so at most one row exists per calendar date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_prices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    /// Shares traded; never negative (CHECK constraint)
    pub volume: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
