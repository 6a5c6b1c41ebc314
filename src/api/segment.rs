//! Surface segmentation endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::api::json_body;
use crate::api::requests::{segmentation_job, SegmentRequest};
use crate::error::{AppError, ClientFallback};
use crate::gateway::{JobOrchestrator, JobOutcome, PollPolicy};
use crate::response::{normalize_segments, Segment};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SegmentsResponse {
    pub segments: Vec<Segment>,
}

/// Errors from this endpoint tell the caller to fall back client-side
#[tracing::instrument(name = "segment_image", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn segment_image(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SegmentRequest>, JsonRejection>,
) -> Result<Json<SegmentsResponse>, ClientFallback> {
    let provider = state.job_provider()?;
    let image = json_body(payload)?.validate()?;

    let config = &state.settings.replicate;
    let policy = PollPolicy::new(config.poll_interval(), config.segmentation.max_attempts);
    let request = segmentation_job(&config.segmentation.version, &image);

    let output = match JobOrchestrator::new(provider, policy).run(&request).await? {
        JobOutcome::Succeeded(output) => output,
        JobOutcome::Failed(reason) => {
            return Err(AppError::JobFailed(format!("Segmentation failed: {}", reason)).into())
        }
        JobOutcome::TimedOut { job_id, attempts } => {
            return Err(AppError::JobTimedOut { job_id, attempts }.into())
        }
    };

    let segments = normalize_segments(&output, config.segmentation.max_segments);
    info!(count = segments.len(), "Segmented image");
    Ok(Json(SegmentsResponse { segments }))
}
