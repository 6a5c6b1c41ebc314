//! Drives a single remote job from submission to a terminal state

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::backend::traits::{Job, JobProvider, JobRequest, JobStatus};
use crate::error::Result;

/// Fixed-interval polling budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay before each poll
    pub interval: Duration,
    /// Maximum number of polls after submission
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// How a job ended
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Succeeded(Value),
    /// The provider reported the job as failed
    Failed(String),
    /// The poll budget ran out before the job reached a terminal state
    TimedOut { job_id: String, attempts: u32 },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Succeeded(_))
    }
}

/// Submits a job and polls it until it is terminal or the budget is spent.
///
/// Errors from the provider itself (HTTP failures, bad payloads) are returned
/// as `Err`; the job's own end state is always an `Ok(JobOutcome)`.
pub struct JobOrchestrator<'a> {
    provider: &'a dyn JobProvider,
    policy: PollPolicy,
}

impl<'a> JobOrchestrator<'a> {
    pub fn new(provider: &'a dyn JobProvider, policy: PollPolicy) -> Self {
        Self { provider, policy }
    }

    pub async fn run(&self, request: &JobRequest) -> Result<JobOutcome> {
        let mut job = self.provider.submit(request).await?;
        let mut attempts = 0;

        while !job.status.is_terminal() && attempts < self.policy.max_attempts {
            tokio::time::sleep(self.policy.interval).await;
            job = self.provider.poll(&job.id).await?;
            attempts += 1;

            debug!(
                provider = %self.provider.name(),
                job_id = %job.id,
                attempt = attempts,
                status = ?job.status,
                "Polled job"
            );
        }

        let outcome = match job.status {
            JobStatus::Succeeded => match job.output {
                Some(output) => JobOutcome::Succeeded(output),
                None => JobOutcome::Failed("Job succeeded without output".to_string()),
            },
            JobStatus::Failed => JobOutcome::Failed(failure_reason(&job)),
            JobStatus::Pending | JobStatus::Running => JobOutcome::TimedOut {
                job_id: job.id.clone(),
                attempts,
            },
        };

        match &outcome {
            JobOutcome::Succeeded(_) => {
                info!(provider = %self.provider.name(), job_id = %job.id, attempts, "Job succeeded")
            }
            JobOutcome::Failed(reason) => {
                warn!(provider = %self.provider.name(), job_id = %job.id, reason = %reason, "Job failed")
            }
            JobOutcome::TimedOut { .. } => {
                warn!(provider = %self.provider.name(), job_id = %job.id, attempts, "Job timed out")
            }
        }

        Ok(outcome)
    }
}

fn failure_reason(job: &Job) -> String {
    match &job.error {
        Some(Value::String(message)) => message.clone(),
        Some(other) => other.to_string(),
        None => "Job failed".to_string(),
    }
}
