//! Wall repainting endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::json_body;
use crate::api::requests::{inpaint_job, InpaintRequest, InpaintTier};
use crate::error::{AppError, Result};
use crate::gateway::{FallbackChain, PollPolicy, Strategy};
use crate::response::base64::{create_data_url, PNG_MEDIA_TYPE};
use crate::response::first_output_url;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InpaintResponse {
    pub image_url: String,
    pub success: bool,
}

#[tracing::instrument(name = "inpaint_walls", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn inpaint_walls(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<InpaintRequest>, JsonRejection>,
) -> Result<Json<InpaintResponse>> {
    let provider = state.job_provider()?;
    let target = json_body(payload)?.validate()?;

    let config = &state.settings.replicate;
    let models = &config.inpainting;

    let success = FallbackChain::new(provider, "Both inpainting models failed")
        .then(Strategy::new(
            "primary",
            inpaint_job(&models.primary, &target, InpaintTier::Primary)?,
            PollPolicy::new(config.poll_interval(), models.primary.max_attempts),
        ))
        .then(Strategy::new(
            "fallback",
            inpaint_job(&models.fallback, &target, InpaintTier::Fallback)?,
            PollPolicy::new(config.poll_interval(), models.fallback.max_attempts),
        ))
        .run()
        .await?;

    let url = first_output_url(&success.output)
        .ok_or_else(|| AppError::JobFailed("Inpainting returned no image URL".to_string()))?;
    let image = provider.fetch_output(url).await?;

    info!(strategy = %success.strategy, size = image.len(), "Inpainted image");
    Ok(Json(InpaintResponse {
        image_url: create_data_url(&image, PNG_MEDIA_TYPE),
        success: true,
    }))
}
