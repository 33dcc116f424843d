//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::executor::SearchError;
use crate::materialize::{MaterializeError, MaterializeErrorCode};

pub type RestResult<T> = Result<T, RestError>;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Limit outside 1..=max
    #[error("Limit {0} must be between 1 and {1}")]
    InvalidLimit(usize, usize),

    /// order_by names no sortable key
    #[error("Unknown order_by key: {0}")]
    UnknownOrderKey(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("{0}")]
    Search(#[from] SearchError),

    #[error("{0}")]
    Materialize(#[from] MaterializeError),
}

impl RestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidLimit(_, _) => StatusCode::BAD_REQUEST,
            RestError::UnknownOrderKey(_) => StatusCode::BAD_REQUEST,
            RestError::Search(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            RestError::Search(_) => StatusCode::SERVICE_UNAVAILABLE,
            RestError::Materialize(err) if err.code() == MaterializeErrorCode::UnitsSectionCycle => {
                StatusCode::CONFLICT
            }
            RestError::Materialize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<RestError> for ErrorResponse {
    fn from(err: RestError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
