//! Failure taxonomy and the terminal classifier that turns failures into
//! HTTP responses.
//!
//! Classification goes by variant, never by message text.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{response::ErrorResponse, store::StoreError};

pub const CONTENT_MISSING: &str = "content missing";
pub const MALFORMATTED_ID: &str = "malformatted id";
pub const INTERNAL_ERROR: &str = "internal server error";

/// Any failure a handler can return.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required field was absent from the request payload.
    #[error("content missing")]
    ContentMissing,
    /// The request body was not well-formed JSON of the expected shape.
    #[error("{0}")]
    PayloadParse(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MalformedId,
    Validation,
    Reference,
    PayloadParse,
    Unclassified,
}

impl AppError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::ContentMissing => FailureKind::Validation,
            AppError::PayloadParse(_) => FailureKind::PayloadParse,
            AppError::Store(StoreError::MalformedId(_)) => FailureKind::MalformedId,
            AppError::Store(StoreError::Validation(_)) => FailureKind::Validation,
            AppError::Store(StoreError::Reference(_)) => FailureKind::Reference,
            AppError::Store(StoreError::Database(_)) => FailureKind::Unclassified,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::PayloadParse(rejection.body_text())
    }
}

/// Maps a failure to its client-facing status and body.
///
/// Returns `None` for unclassified failures, which must not be answered as
/// client errors.
pub fn classify(err: &AppError) -> Option<(StatusCode, ErrorResponse)> {
    let body = match err.kind() {
        FailureKind::MalformedId => ErrorResponse::new(MALFORMATTED_ID),
        FailureKind::Validation | FailureKind::Reference | FailureKind::PayloadParse => {
            ErrorResponse::new(err.to_string())
        }
        FailureKind::Unclassified => return None,
    };
    Some((StatusCode::BAD_REQUEST, body))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match classify(&self) {
            Some((status, body)) => {
                tracing::warn!(kind = ?self.kind(), error = %self, "request failed");
                (status, Json(body)).into_response()
            }
            None => {
                tracing::error!(error = %self, "unhandled failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(INTERNAL_ERROR)),
                )
                    .into_response()
            }
        }
    }
}
