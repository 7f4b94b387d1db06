//! Error types for the Highlighter server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::document::DocumentError;
use crate::highlight::{AnnotateError, HighlightError};
use crate::oracle::OracleError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Every failure of a request falls into one of three classes: the client
/// sent something unusable, the selection oracle failed, or the server did.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Input(String),

    #[error("oracle unavailable: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Input(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            AppError::Input(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                msg.clone()
            }
            AppError::Upstream(msg) => {
                tracing::error!("Oracle error: {}", msg);
                self.to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<DocumentError> for AppError {
    fn from(err: DocumentError) -> Self {
        if err.is_client_error() {
            AppError::Input(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<OracleError> for AppError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::InvalidBudget(msg) => AppError::Input(msg),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

impl From<AnnotateError> for AppError {
    fn from(err: AnnotateError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<HighlightError> for AppError {
    fn from(err: HighlightError) -> Self {
        match err {
            HighlightError::Document(e) => e.into(),
            HighlightError::Oracle(e) => e.into(),
            HighlightError::Annotate(e) => e.into(),
            HighlightError::Delivery(e) => e.into(),
        }
    }
}
