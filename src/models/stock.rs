//! Stock price request/response models
//!
//! Wire types for the `/stocks/` endpoints. Field names are camelCase on the
//! wire; the snake_case spellings are accepted on input as aliases.

use chrono::NaiveDate;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

use crate::entities::stock_prices;

/// One daily price record, as read from and written to the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(alias = "adj_close")]
    pub adj_close: f64,
    pub volume: i64,
}

impl StockRecord {
    /// Check the field-level invariants the table relies on
    pub fn validate(&self) -> Result<(), String> {
        if self.volume < 0 {
            return Err(format!("volume must not be negative, got {}", self.volume));
        }
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("adjClose", self.adj_close),
        ];
        for (name, value) in prices {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
        }
        Ok(())
    }

    pub fn to_active_model(&self) -> stock_prices::ActiveModel {
        stock_prices::ActiveModel {
            date: Set(self.date),
            open: Set(self.open),
            high: Set(self.high),
            low: Set(self.low),
            close: Set(self.close),
            adj_close: Set(self.adj_close),
            volume: Set(self.volume),
        }
    }
}

impl From<stock_prices::Model> for StockRecord {
    fn from(model: stock_prices::Model) -> Self {
        Self {
            date: model.date,
            open: model.open,
            high: model.high,
            low: model.low,
            close: model.close,
            adj_close: model.adj_close,
            volume: model.volume,
        }
    }
}

/// Query parameters for GET /stocks/
///
/// `page` and `limit` are signed so that zero and negative values reach
/// validation instead of failing to parse.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuery {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Records per page (default: configured default limit)
    pub limit: Option<i64>,
    /// Inclusive lower date bound
    #[serde(alias = "date_from")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound
    #[serde(alias = "date_to")]
    pub date_to: Option<NaiveDate>,
}

/// Response for POST /stocks/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertStocksResponse {
    /// Records written by this request
    pub created_count: u64,
    /// Records skipped because the database rejected them as duplicates
    pub skipped_count: u64,
    /// Rows in the table after the batch
    pub total_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
