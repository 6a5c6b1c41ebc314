//! Ordered provider strategies tried until one succeeds

use serde_json::Value;
use tracing::{info, warn};

use crate::backend::traits::{JobProvider, JobRequest};
use crate::error::{AppError, Result};
use crate::gateway::orchestrator::{JobOrchestrator, JobOutcome, PollPolicy};

/// One way of running the logical operation
#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: String,
    pub request: JobRequest,
    pub policy: PollPolicy,
}

impl Strategy {
    pub fn new(name: impl Into<String>, request: JobRequest, policy: PollPolicy) -> Self {
        Self {
            name: name.into(),
            request,
            policy,
        }
    }
}

/// Output of the first strategy that succeeded
#[derive(Debug, Clone)]
pub struct FallbackSuccess {
    pub strategy: String,
    pub output: Value,
}

/// Runs each strategy through its own orchestrator, in order, stopping at the
/// first success. Every strategy runs at most once.
pub struct FallbackChain<'a> {
    provider: &'a dyn JobProvider,
    strategies: Vec<Strategy>,
    exhausted_message: String,
}

impl<'a> FallbackChain<'a> {
    pub fn new(provider: &'a dyn JobProvider, exhausted_message: impl Into<String>) -> Self {
        Self {
            provider,
            strategies: Vec::new(),
            exhausted_message: exhausted_message.into(),
        }
    }

    pub fn then(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub async fn run(&self) -> Result<FallbackSuccess> {
        let mut last_reason = "No strategies configured".to_string();

        for (tier, strategy) in self.strategies.iter().enumerate() {
            let outcome = JobOrchestrator::new(self.provider, strategy.policy)
                .run(&strategy.request)
                .await;

            let reason = match outcome {
                Ok(JobOutcome::Succeeded(output)) => {
                    info!(strategy = %strategy.name, tier, "Strategy succeeded");
                    return Ok(FallbackSuccess {
                        strategy: strategy.name.clone(),
                        output,
                    });
                }
                Ok(JobOutcome::Failed(reason)) => reason,
                Ok(JobOutcome::TimedOut { job_id, attempts }) => {
                    format!("Job {} did not finish after {} polls", job_id, attempts)
                }
                Err(e) => e.to_string(),
            };

            warn!(strategy = %strategy.name, tier, reason = %reason, "Strategy failed");
            last_reason = reason;
        }

        Err(AppError::AllStrategiesFailed {
            message: self.exhausted_message.clone(),
            last_reason,
        })
    }
}
