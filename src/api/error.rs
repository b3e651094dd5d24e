use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::handlers::HandlerError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    /// Body exceeded the limit, in bytes
    #[error("payload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("{0} not found")]
    NotFound(String),
    #[error("failed to {action}: {detail}")]
    Storage { action: &'static str, detail: String },
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidPayload(_) => "INVALID_INPUT",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Storage { .. } => "STORAGE_FAILURE",
        }
    }

    /// Human readable summary placed in the envelope's `message`
    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidPayload(_) => "Invalid data provided.".to_string(),
            ApiError::PayloadTooLarge(_) => "Payload too large.".to_string(),
            ApiError::NotFound(what) => format!("{} not found.", capitalize(what)),
            ApiError::Storage { action, .. } => format!("Failed to {action}."),
        }
    }

    /// Diagnostic detail placed in the envelope's `error`
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::InvalidPayload(detail) => Some(detail.clone()),
            ApiError::PayloadTooLarge(limit) => {
                Some(format!("body exceeds the {limit} byte limit"))
            }
            ApiError::NotFound(_) => None,
            ApiError::Storage { detail, .. } => Some(detail.clone()),
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code(),
            message: self.message(),
            error: self.detail(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<HandlerError> for ApiError {
    fn from(value: HandlerError) -> Self {
        match value {
            HandlerError::InvalidInput(detail) => ApiError::InvalidPayload(detail),
            HandlerError::NotFound(what) => ApiError::NotFound(what),
            HandlerError::StorageFailure { action, source } => ApiError::Storage {
                action,
                detail: source.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}
