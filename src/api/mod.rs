//! HTTP API - routes, handlers and request contracts

pub mod colors;
pub mod inpaint;
pub mod requests;
pub mod routes;
pub mod segment;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, Result};

/// Unwrap a JSON body, turning extractor rejections into JSON client errors
pub(crate) fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(rejection.body_text())
        } else {
            AppError::InvalidRequest(format!("Invalid JSON body: {}", rejection.body_text()))
        }
    })
}
