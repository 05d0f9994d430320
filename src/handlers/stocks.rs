//! Stock price handlers
//!
//! GET /stocks/ for paginated, date-filtered reads and POST /stocks/ for
//! bulk inserts.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{HeaderMap, HeaderValue},
    Json,
};
use sea_orm::TransactionTrait;
use tracing::info;

use crate::errors::ApiError;
use crate::models::stock::{InsertStocksResponse, StockQuery, StockRecord};
use crate::services::ingestion;
use crate::services::pagination::{PageRequest, PaginationError};
use crate::services::stock_store::{DateRange, SeaOrmStockStore, StockStore};
use crate::AppState;

/// Records matching the date filter, across all pages
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Pages available for the date filter at the requested limit
pub const TOTAL_PAGES_HEADER: &str = "x-total-pages";

/// GET /stocks/
///
/// Returns one page of daily records, ascending by date.
///
/// # Query Parameters
/// - `page`: 1-based page number (default: 1)
/// - `limit`: records per page (default: 100)
/// - `dateFrom`, `dateTo`: inclusive `YYYY-MM-DD` bounds
///
/// # Response
/// - 200: JSON array of records, with `X-Total-Count` and `X-Total-Pages`
/// - 400: invalid parameters, or page beyond the last one
/// - 404: no records match the filter
/// - 500: database error
pub async fn get_stocks(
    State(state): State<AppState>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<(HeaderMap, Json<Vec<StockRecord>>), ApiError> {
    let Query(query) = query?;

    info!(
        page = query.page,
        limit = query.limit,
        date_from = ?query.date_from,
        date_to = ?query.date_to,
        "Stock query received"
    );

    let request = PageRequest::from_params(query.page, query.limit, &state.pagination)?;
    let range = DateRange::new(query.date_from, query.date_to).map_err(ApiError::InvalidParameter)?;

    // Count and fetch share one connection; dropping the transaction on an
    // early return rolls it back and hands the connection back to the pool.
    let txn = state.db.begin().await?;
    let store = SeaOrmStockStore::new(&txn);

    let total = store.count(&range).await?;
    let page = request.resolve(total)?;
    let records = store.find_page(&range, page.window).await?;
    txn.commit().await?;

    if records.is_empty() {
        return Err(PaginationError::NotFound.into());
    }

    info!(
        count = records.len(),
        total = page.total,
        max_pages = page.max_pages,
        "Stock page returned"
    );

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total));
    headers.insert(TOTAL_PAGES_HEADER, HeaderValue::from(page.max_pages));

    Ok((headers, Json(records)))
}

/// POST /stocks/
///
/// Inserts a JSON array of records in order.
///
/// # Response
/// - 200: `{createdCount, skippedCount, totalCount}`
/// - 409: a date already exists; earlier records in the batch are kept
/// - 422: malformed body or a record with invalid fields (nothing written)
/// - 500: database error
pub async fn create_stocks(
    State(state): State<AppState>,
    payload: Result<Json<Vec<StockRecord>>, JsonRejection>,
) -> Result<Json<InsertStocksResponse>, ApiError> {
    let Json(records) = payload?;

    info!(count = records.len(), "Stock insert request received");

    let store = SeaOrmStockStore::new(&state.db);
    let summary = ingestion::ingest(&store, &records).await?;

    Ok(Json(summary.into()))
}
