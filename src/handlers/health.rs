use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::models::stock::{ErrorResponse, HealthResponse};
use crate::AppState;

/// GET /health - checks that the database answers
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.db.ping().await.map_err(|e| {
        error!(error = %e, "Database ping failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: format!("Database unavailable: {}", e),
                code: "DATABASE_UNAVAILABLE".to_string(),
            }),
        )
    })?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}
