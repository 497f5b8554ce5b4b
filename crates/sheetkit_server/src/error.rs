//! Uniform response envelope and request-boundary error mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use sheetkit_io_xlsx::XlsxGenerationError;
use sheetkit_web_reader::ReaderError;

/// `{ success, message, data?, statusCode }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub status_code: u16,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            status_code: StatusCode::OK.as_u16(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate workbook: {0}")]
    Generation(String),
    #[error("Failed to fetch page: {0}")]
    Fetch(String),
    #[error("Failed to parse page: {0}")]
    Parse(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Generation(_) | Self::Fetch(_) | Self::Parse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(error = %self, "request rejected");
        }
        ApiEnvelope::<()> {
            success: false,
            message: self.to_string(),
            data: None,
            status_code: status.as_u16(),
        }
        .into_response()
    }
}

impl From<XlsxGenerationError> for AppError {
    fn from(err: XlsxGenerationError) -> Self {
        if err.is_invalid_input() {
            Self::Validation(err.to_string())
        } else {
            Self::Generation(err.to_string())
        }
    }
}

impl From<ReaderError> for AppError {
    fn from(err: ReaderError) -> Self {
        match err {
            ReaderError::InvalidUrl { .. } => Self::Validation(err.to_string()),
            ReaderError::Fetch { .. } | ReaderError::Status { .. } => Self::Fetch(err.to_string()),
            ReaderError::Parse(_) => Self::Parse(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}
