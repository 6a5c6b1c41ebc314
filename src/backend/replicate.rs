//! Replicate predictions client

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{Job, JobProvider, JobRequest, JobStatus};
use crate::config::ReplicateConfig;
use crate::error::{AppError, Result};

/// Image model provider backed by the Replicate predictions API
pub struct ReplicateBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

/// Prediction as returned by both the create and get endpoints
#[derive(Debug, Deserialize)]
struct Prediction {
    #[serde(default)]
    id: String,
    #[serde(default)]
    status: PredictionStatus,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl From<PredictionStatus> for JobStatus {
    fn from(status: PredictionStatus) -> Self {
        match status {
            PredictionStatus::Starting => JobStatus::Pending,
            PredictionStatus::Processing => JobStatus::Running,
            PredictionStatus::Succeeded => JobStatus::Succeeded,
            PredictionStatus::Failed | PredictionStatus::Canceled | PredictionStatus::Unknown => {
                JobStatus::Failed
            }
        }
    }
}

impl From<Prediction> for Job {
    fn from(prediction: Prediction) -> Self {
        let output = prediction.output.filter(|o| !o.is_null());
        let mut status = JobStatus::from(prediction.status);

        // A success without output is of no use to the caller
        if status == JobStatus::Succeeded && output.is_none() {
            status = JobStatus::Failed;
        }

        Job {
            id: prediction.id,
            status,
            output,
            error: prediction.error.filter(|e| !e.is_null()),
        }
    }
}

impl ReplicateBackend {
    /// Create a new client from configuration
    pub fn new(config: &ReplicateConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }

    async fn read_prediction(&self, response: Response, action: &str) -> Result<Job> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details: Value =
                serde_json::from_str(&body).unwrap_or_else(|_| json!({ "raw": body }));
            warn!(provider = "replicate", status = %status, error = %details, "{} failed", action);

            let detail = details
                .get("detail")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(AppError::Upstream {
                message: format!("Replicate API error: {}", detail),
                debug: Some(details),
            });
        }

        let prediction: Prediction = response.json().await?;
        Ok(prediction.into())
    }
}

#[async_trait]
impl JobProvider for ReplicateBackend {
    fn name(&self) -> &str {
        "replicate"
    }

    async fn submit(&self, request: &JobRequest) -> Result<Job> {
        debug!(provider = "replicate", version = %request.version, "Creating prediction");

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await?;

        let job = self.read_prediction(response, "Create prediction").await?;
        debug!(provider = "replicate", job_id = %job.id, status = ?job.status, "Prediction created");
        Ok(job)
    }

    async fn poll(&self, job_id: &str) -> Result<Job> {
        let response = self
            .client
            .get(format!("{}/v1/predictions/{}", self.base_url, job_id))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        self.read_prediction(response, "Get prediction").await
    }

    async fn fetch_output(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "Failed to download output image: {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        debug!(provider = "replicate", size = bytes.len(), "Downloaded output");
        Ok(bytes.to_vec())
    }
}
