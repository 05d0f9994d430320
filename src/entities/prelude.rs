//! `SeaORM` Entity prelude

pub use super::stock_prices::Entity as StockPrices;
