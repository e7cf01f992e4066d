//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `RepoUnknown`, `CommitNotFound`, `PathNotFound` → 404
//! - `InvalidLine`, `NotABlob`, `OutOfRange` → 400
//! - `BlameUnavailable`, `LineOutOfRange`, `DeletionNotPropagatable`,
//!   `Git`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not configured: {0}")]
    RepoUnknown(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Invalid line number {line} in {commit}")]
    InvalidLine { line: usize, commit: String },

    #[error("Unable to obtain blame information for {0}")]
    BlameUnavailable(String),

    #[error("{0} is not a blob")]
    NotABlob(String),

    #[error("Unable to slice file content of {path}: {start}+{length} out of range")]
    OutOfRange {
        path: String,
        start: usize,
        length: usize,
    },

    #[error("Line number is out of range")]
    LineOutOfRange,

    #[error("Cannot propagate line number in a deletion")]
    DeletionNotPropagatable,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::RepoUnknown(_) | AppError::CommitNotFound(_) | AppError::PathNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::InvalidLine { .. } | AppError::NotABlob(_) | AppError::OutOfRange { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::Git(_)
            | AppError::BlameUnavailable(_)
            | AppError::LineOutOfRange
            | AppError::DeletionNotPropagatable
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
