use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use std::env;
use stock_prices_backend::{build_router, services::pagination::PaginationLimits, AppState};
use tower::ServiceExt;

/// Set up a migrated test database
///
/// Uses the TEST_DATABASE_URL environment variable or falls back to an
/// in-memory SQLite database. The schema is rebuilt on every call, so a
/// shared server database needs `--test-threads=1`.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let database_url =
        env::var("TEST_DATABASE_URL").unwrap_or_else(|_| "sqlite::memory:".to_string());

    // An in-memory SQLite database lives and dies with its single connection
    let mut options = ConnectOptions::new(database_url);
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::fresh(&db).await?;
    Ok(db)
}

#[allow(dead_code)]
pub async fn build_test_router() -> Router {
    let db = setup_test_db().await.expect("Failed to set up test DB");
    build_router(AppState {
        db,
        pagination: PaginationLimits::default(),
    })
}

#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Run one request through the router and decode the JSON body
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    (status, headers, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "Test database setup should succeed");
    }
}
