//! Error types for the GROBID parse server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::grobid::GrobidError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Workflow error type, one variant per failure kind a caller can see
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    StoreUnavailable(String),

    #[error("File is too large. Max file size is {max_mb}mb.")]
    TooLarge { max_mb: u64 },

    #[error("PDF is empty.")]
    EmptyContent,

    #[error("{message}")]
    ExtractionService { status: StatusCode, message: String },

    #[error("GROBID did not return any content.")]
    EmptyResult,

    #[error("PDF has already been parsed with id: {0}")]
    AlreadyProcessed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::EmptyContent => StatusCode::BAD_REQUEST,
            Self::ExtractionService { status, .. } => *status,
            Self::EmptyResult => StatusCode::INTERNAL_SERVER_ERROR,
            Self::AlreadyProcessed(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Object storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    #[error("S3 SDK error: {0}")]
    SdkError(String),
}

/// Record index errors
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("DynamoDB error: {0}")]
    SdkError(String),

    #[error("Malformed record {id}: {reason}")]
    Malformed { id: String, reason: String },
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ObjectNotFound { bucket, .. } => {
                AppError::NotFound(format!("PDF not found in S3 bucket: {}", bucket))
            }
            StorageError::BucketNotFound(bucket) => {
                AppError::StoreUnavailable(format!("S3 bucket not found: {}", bucket))
            }
            StorageError::SdkError(msg) => AppError::StoreUnavailable(format!("S3 error: {}", msg)),
        }
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        let message = err.to_string();
        match err {
            IndexError::SdkError(_) => AppError::StoreUnavailable(message),
            IndexError::Malformed { .. } => AppError::Internal(message),
        }
    }
}

impl From<GrobidError> for AppError {
    fn from(err: GrobidError) -> Self {
        let message = err.to_string();
        match err {
            GrobidError::Status { status, .. } => AppError::ExtractionService {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            GrobidError::Transport(_) => AppError::ExtractionService {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message,
            },
            GrobidError::Decode(_) => AppError::Internal(message),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", message);
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
