//! Error handling for the API server

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fhsk_core::FhskError;
use serde_json::json;
use thiserror::Error;

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Data(#[from] FhskError),

    #[error("Site not found: {0}")]
    SiteNotFound(String),

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    #[error("Action {0} does not accept this method")]
    MethodNotAllowed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Data(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Data(FhskError::InvalidRow(_)) => StatusCode::BAD_REQUEST,
            ApiError::SiteNotFound(_) | ApiError::ActionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            ApiError::Data(e) if e.is_not_found() => self.to_string(),
            ApiError::Data(FhskError::InvalidRow(_)) => self.to_string(),
            ApiError::Data(_) => "Storage error".to_string(),
            ApiError::Config(_) => "Configuration error".to_string(),
            ApiError::Serialization(_) => "Invalid JSON format".to_string(),
            ApiError::Io(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

// Convenience functions for common errors
impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }

    pub fn validation(msg: &str) -> Self {
        Self::Validation(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_not_found() {
        let err = ApiError::from(FhskError::RowNotFound(420));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Could not find row 420");
    }

    #[test]
    fn storage_failures_are_internal() {
        let err = ApiError::from(FhskError::storage("disk I/O error"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_mistakes_are_bad_requests() {
        assert_eq!(ApiError::validation("name").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(FhskError::invalid_row("is_archived")).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
