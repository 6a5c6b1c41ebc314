//! Common traits and types for generation providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Lifecycle state of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Whether no further state change can occur
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

/// One outstanding unit of remote work
#[derive(Debug, Clone)]
pub struct Job {
    /// Provider-issued identifier
    pub id: String,

    pub status: JobStatus,

    /// Result payload, only meaningful once succeeded
    pub output: Option<Value>,

    /// Diagnostic payload, only meaningful once failed
    pub error: Option<Value>,
}

impl Job {
    pub fn new(id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            id: id.into(),
            status,
            output: None,
            error: None,
        }
    }

    pub fn with_output(mut self, output: Value) -> Self {
        self.output = Some(output);
        self
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }
}

/// Request to start a job on a hosted model
#[derive(Debug, Clone, Serialize)]
pub struct JobRequest {
    /// Model version identifier
    pub version: String,

    /// Model-specific input parameters
    pub input: Value,
}

/// Provider that runs models as asynchronous jobs
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Start a job
    async fn submit(&self, request: &JobRequest) -> Result<Job>;

    /// Fetch the current state of a job
    async fn poll(&self, job_id: &str) -> Result<Job>;

    /// Download a file produced by a job
    async fn fetch_output(&self, url: &str) -> Result<Vec<u8>>;
}

/// Provider that answers a prompt with text
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Send a single user prompt and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String>;
}
