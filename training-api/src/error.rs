//! Error type shared by the validity engine, the persistence helpers and the
//! HTTP layer.
//!
//! Every failure is terminal for the request that caused it. Handlers convert
//! a [`TrainingError`] into a JSON `{ "error": ... }` body with the matching
//! HTTP status.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

/// Error response structure for API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

/// What handlers return on failure.
pub type ApiError = status::Custom<Json<ErrorResponse>>;

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid date '{value}': expected format {expected}")]
    InvalidFormat {
        value: String,
        expected: &'static str,
    },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(DieselError),
}

impl TrainingError {
    pub fn not_found(what: impl Into<String>) -> Self {
        TrainingError::NotFound(what.into())
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        TrainingError::Validation(reason.into())
    }

    pub fn status(&self) -> Status {
        match self {
            TrainingError::NotFound(_) => Status::NotFound,
            TrainingError::InvalidFormat { .. } => Status::BadRequest,
            TrainingError::Validation(_) => Status::BadRequest,
            TrainingError::Conflict(_) => Status::Conflict,
            TrainingError::Database(_) => Status::InternalServerError,
        }
    }
}

/// Unique constraint violations surface as conflicts carrying the SQLite
/// message verbatim (e.g. `UNIQUE constraint failed: employees.mobile_number`).
impl From<DieselError> for TrainingError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                TrainingError::Conflict(info.message().to_string())
            }
            DieselError::NotFound => TrainingError::NotFound("Record not found".to_string()),
            other => TrainingError::Database(other),
        }
    }
}

impl From<TrainingError> for ApiError {
    fn from(err: TrainingError) -> Self {
        let message = match &err {
            TrainingError::Database(e) => {
                error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        status::Custom(err.status(), Json(ErrorResponse { error: message }))
    }
}
