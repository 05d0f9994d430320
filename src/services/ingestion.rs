//! Bulk ingestion of daily stock records
//!
//! Records are written one at a time, in request order. A date that already
//! exists when it is checked stops the batch; a uniqueness violation raised
//! by the database at insert time only skips that record.

use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::stock::{InsertStocksResponse, StockRecord};
use crate::services::stock_store::{InsertOutcome, StockStore};

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Invalid record for date {date}: {reason}")]
    InvalidRecord { date: NaiveDate, reason: String },

    #[error(
        "A record for date {date} already exists in the database. \
         {created_count} records were added before the conflict."
    )]
    DuplicateKey { date: NaiveDate, created_count: u64 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of a completed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionSummary {
    pub created_count: u64,
    pub skipped_count: u64,
    /// Rows in the table after the batch
    pub total_count: u64,
}

impl From<IngestionSummary> for InsertStocksResponse {
    fn from(summary: IngestionSummary) -> Self {
        Self {
            created_count: summary.created_count,
            skipped_count: summary.skipped_count,
            total_count: summary.total_count,
        }
    }
}

/// Reject the whole batch if any record breaks a field invariant
pub fn validate_batch(records: &[StockRecord]) -> Result<(), IngestionError> {
    for record in records {
        record
            .validate()
            .map_err(|reason| IngestionError::InvalidRecord {
                date: record.date,
                reason,
            })?;
    }
    Ok(())
}

/// Insert `records` in order
///
/// Records committed before a `DuplicateKey` abort stay committed; the error
/// carries how many there were.
pub async fn ingest<S>(store: &S, records: &[StockRecord]) -> Result<IngestionSummary, IngestionError>
where
    S: StockStore + ?Sized,
{
    validate_batch(records)?;

    let mut created_count = 0u64;
    let mut skipped_count = 0u64;

    for record in records {
        if store.exists_by_date(record.date).await? {
            warn!(
                date = %record.date,
                created_count = created_count,
                "Duplicate date in batch, aborting ingestion"
            );
            return Err(IngestionError::DuplicateKey {
                date: record.date,
                created_count,
            });
        }

        match store.insert(record).await? {
            InsertOutcome::Inserted => {
                created_count += 1;
                debug!(date = %record.date, "Inserted stock record");
            }
            InsertOutcome::Conflict => {
                skipped_count += 1;
                warn!(date = %record.date, "Storage rejected record as duplicate, skipping");
            }
        }
    }

    let total_count = store.count_all().await?;

    info!(
        received = records.len(),
        created_count = created_count,
        skipped_count = skipped_count,
        total_count = total_count,
        "Stock ingestion complete"
    );

    Ok(IngestionSummary {
        created_count,
        skipped_count,
        total_count,
    })
}
