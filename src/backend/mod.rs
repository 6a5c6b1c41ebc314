//! Backend module - Provider traits and HTTP clients

pub mod anthropic;
pub mod replicate;
pub mod traits;

pub use anthropic::AnthropicBackend;
pub use replicate::ReplicateBackend;
pub use traits::{Job, JobProvider, JobRequest, JobStatus, TextProvider};
