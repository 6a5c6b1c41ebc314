//! Common error types for the gateway

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{name} not found in environment variables. {hint}")]
    MissingSecret { name: &'static str, hint: &'static str },

    #[error("{message}")]
    Upstream { message: String, debug: Option<Value> },

    #[error("{message}")]
    MalformedReply {
        message: String,
        raw: String,
        parse_error: Option<String>,
    },

    #[error("{0}")]
    JobFailed(String),

    #[error("Job {job_id} did not finish after {attempts} polls")]
    JobTimedOut { job_id: String, attempts: u32 },

    #[error("{message}")]
    AllStrategiesFailed { message: String, last_reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Upstream error without a diagnostic payload
    pub fn upstream(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            debug: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn debug_payload(&self) -> Option<Value> {
        match self {
            AppError::MissingSecret { hint, .. } => Some(json!({ "hint": hint })),
            AppError::Upstream { debug, .. } => debug.clone(),
            AppError::MalformedReply {
                raw, parse_error, ..
            } => Some(json!({
                "responseText": raw,
                "parseError": parse_error,
            })),
            AppError::AllStrategiesFailed { last_reason, .. } => {
                Some(json!({ "lastReason": last_reason }))
            }
            _ => None,
        }
    }

    /// Build the JSON error response, optionally telling the caller it may
    /// retry on its own side.
    pub fn into_response_with_fallback(self, fallback: bool) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
            debug: self.debug_payload(),
            fallback: (fallback && status.is_server_error()).then_some(true),
        };

        (status, Json(body)).into_response()
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with_fallback(false)
    }
}

/// Error wrapper for endpoints whose callers can fall back client-side.
/// Server errors carry `"fallback": true`.
#[derive(Debug)]
pub struct ClientFallback(pub AppError);

impl From<AppError> for ClientFallback {
    fn from(err: AppError) -> Self {
        ClientFallback(err)
    }
}

impl IntoResponse for ClientFallback {
    fn into_response(self) -> Response {
        self.0.into_response_with_fallback(true)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
