//! Configuration module

mod settings;

pub use settings::{
    AnthropicConfig, InpaintModelConfig, InpaintingConfig, LoggingConfig, ReplicateConfig,
    Secrets, SegmentationConfig, ServerConfig, Settings, ANTHROPIC_KEY_VAR, MAX_SEGMENTS,
    REPLICATE_KEY_VAR,
};
