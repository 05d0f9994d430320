use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::stock::ErrorResponse;
use crate::services::ingestion::IngestionError;
use crate::services::pagination::PaginationError;

/// Errors surfaced to API clients
///
/// Service errors are wrapped as-is so their messages live in one place.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    Ingestion(#[from] IngestionError),

    #[error("{0}")]
    MalformedBody(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_)
            | ApiError::Pagination(PaginationError::InvalidParameter(_))
            | ApiError::Pagination(PaginationError::OutOfRange { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Pagination(PaginationError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Ingestion(IngestionError::DuplicateKey { .. }) => StatusCode::CONFLICT,
            ApiError::Ingestion(IngestionError::InvalidRecord { .. }) | ApiError::MalformedBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Ingestion(IngestionError::Database(_)) | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidParameter(_)
            | ApiError::Pagination(PaginationError::InvalidParameter(_)) => "INVALID_PARAMETER",
            ApiError::Pagination(PaginationError::OutOfRange { .. }) => "PAGE_OUT_OF_RANGE",
            ApiError::Pagination(PaginationError::NotFound) => "NOT_FOUND",
            ApiError::Ingestion(IngestionError::DuplicateKey { .. }) => "DUPLICATE_DATE",
            ApiError::Ingestion(IngestionError::InvalidRecord { .. }) => "INVALID_RECORD",
            ApiError::MalformedBody(_) => "MALFORMED_BODY",
            ApiError::Ingestion(IngestionError::Database(_)) | ApiError::Database(_) => {
                "DATABASE_ERROR"
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidParameter(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}
