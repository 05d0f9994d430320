// src/lib.rs

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use services::pagination::PaginationLimits;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub pagination: PaginationLimits,
}

pub mod entities {
    pub mod prelude;
    pub mod stock_prices;
}

pub mod services {
    pub mod ingestion;
    pub mod pagination;
    pub mod stock_store;
}

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;

/// Build the HTTP router; `/stocks` is served with and without the trailing slash
pub fn build_router(state: AppState) -> Router {
    let stocks = get(handlers::stocks::get_stocks).post(handlers::stocks::create_stocks);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/stocks", stocks.clone())
        .route("/stocks/", stocks)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
