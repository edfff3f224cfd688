use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::types::user::ValidationError;

/// Failures raised by the user store and the credential hasher.
#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("email is already registered")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),
}

impl StoreError {
    /// Map a driver error, lifting unique-constraint violations to `Conflict`.
    pub fn from_insert(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(e),
        }
    }

    /// Map a driver error, lifting missing rows to `NotFound`.
    pub fn from_lookup(e: SqlxError) -> Self {
        match e {
            SqlxError::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other),
        }
    }
}

/// Error kinds visible to HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,

    #[error("incorrect email or password")]
    IncorrectEmailOrPassword,

    #[error("not authenticated")]
    NotAuthenticated,

    #[error("internal server error")]
    InternalServerError,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::IncorrectEmailOrPassword | ApiError::NotAuthenticated => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "bad request",
            ApiError::IncorrectEmailOrPassword => "incorrect email or password",
            ApiError::NotAuthenticated => "not authenticated",
            ApiError::InternalServerError => "internal server error",
        }
    }
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status(),
            Json(ApiErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
