//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{get, post, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::api::{colors, inpaint, segment};
use crate::error::AppError;
use crate::AppState;

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);
    let body_limit = DefaultBodyLimit::max(state.settings.server.max_body_bytes);

    Router::new()
        .route("/api/generate-colors", api_route(post(colors::generate_colors)))
        .route("/api/segment-image", api_route(post(segment::segment_image)))
        .route("/api/inpaint-walls", api_route(post(inpaint::inpaint_walls)))
        .route_layer(body_limit)
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST endpoints also answer a bare OPTIONS and reject everything else
fn api_route(route: MethodRouter<Arc<AppState>>) -> MethodRouter<Arc<AppState>> {
    route.options(preflight).fallback(method_not_allowed)
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
