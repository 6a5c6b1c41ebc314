//! Gateway module - Job orchestration and provider fallback

pub mod fallback;
pub mod orchestrator;

pub use fallback::{FallbackChain, FallbackSuccess, Strategy};
pub use orchestrator::{JobOrchestrator, JobOutcome, PollPolicy};
