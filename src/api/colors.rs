//! Paint color recommendation endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::json_body;
use crate::api::requests::{color_prompt, ColorRequest};
use crate::error::Result;
use crate::response::colors::{parse_recommendations, ColorRecommendation};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ColorsResponse {
    pub colors: Vec<ColorRecommendation>,
}

#[tracing::instrument(name = "generate_colors", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn generate_colors(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<ColorRequest>, JsonRejection>,
) -> Result<Json<ColorsResponse>> {
    let provider = state.text_provider()?;
    let answers = json_body(payload)?.validate()?;

    let reply = provider.complete(&color_prompt(&answers)).await?;
    let colors = parse_recommendations(&reply).map_err(|e| {
        warn!(provider = %provider.name(), error = %e, "Could not parse color recommendations");
        e
    })?;

    info!(count = colors.len(), "Generated color recommendations");
    Ok(Json(ColorsResponse { colors }))
}
