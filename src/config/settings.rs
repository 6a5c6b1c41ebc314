//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const ANTHROPIC_KEY_VAR: &str = "ANTHROPIC_API_KEY";
pub const REPLICATE_KEY_VAR: &str = "REPLICATE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub replicate: ReplicateConfig,
    #[serde(skip)]
    pub secrets: Secrets,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body; photos arrive inline as data URLs
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_body_bytes() -> usize {
    25 * 1024 * 1024
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Text generation provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_anthropic_url")]
    pub base_url: String,
    #[serde(default = "default_anthropic_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_anthropic_version")]
    pub api_version: String,
    #[serde(default = "default_anthropic_timeout")]
    pub timeout_ms: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: default_anthropic_url(),
            model: default_anthropic_model(),
            max_tokens: default_max_tokens(),
            api_version: default_anthropic_version(),
            timeout_ms: default_anthropic_timeout(),
        }
    }
}

fn default_anthropic_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1500
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

fn default_anthropic_timeout() -> u64 {
    60000
}

/// Image generation provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReplicateConfig {
    #[serde(default = "default_replicate_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_replicate_timeout")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub inpainting: InpaintingConfig,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        Self {
            base_url: default_replicate_url(),
            poll_interval_ms: default_poll_interval(),
            timeout_ms: default_replicate_timeout(),
            segmentation: SegmentationConfig::default(),
            inpainting: InpaintingConfig::default(),
        }
    }
}

impl ReplicateConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn default_replicate_url() -> String {
    "https://api.replicate.com".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

fn default_replicate_timeout() -> u64 {
    30000
}

/// Automatic mask generation model
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentationConfig {
    #[serde(default = "default_sam_version")]
    pub version: String,
    #[serde(default = "default_segmentation_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            version: default_sam_version(),
            max_attempts: default_segmentation_attempts(),
            max_segments: default_max_segments(),
        }
    }
}

fn default_sam_version() -> String {
    "a00212940bc878d3e057bcd9fd7b1ba80a6b1cfe1d00a6c6ebc3c81b5acac450".to_string()
}

fn default_segmentation_attempts() -> u32 {
    60
}

/// Upper bound on surfaces returned from one segmentation
pub const MAX_SEGMENTS: usize = 15;

fn default_max_segments() -> usize {
    MAX_SEGMENTS
}

/// Primary and fallback inpainting models
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InpaintingConfig {
    #[serde(default = "InpaintModelConfig::primary")]
    pub primary: InpaintModelConfig,
    #[serde(default = "InpaintModelConfig::fallback")]
    pub fallback: InpaintModelConfig,
}

impl Default for InpaintingConfig {
    fn default() -> Self {
        Self {
            primary: InpaintModelConfig::primary(),
            fallback: InpaintModelConfig::fallback(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InpaintModelConfig {
    pub version: String,
    pub max_attempts: u32,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    #[serde(default)]
    pub strength: Option<f32>,
    #[serde(default)]
    pub scheduler: Option<String>,
}

impl InpaintModelConfig {
    /// SDXL inpainting
    pub fn primary() -> Self {
        Self {
            version: "95b7223104132402a9ae91cc677285bc5eb997834bd2349fa486f53910fd68b3"
                .to_string(),
            max_attempts: 90,
            num_inference_steps: 30,
            guidance_scale: 7.5,
            strength: Some(0.85),
            scheduler: Some("K_EULER".to_string()),
        }
    }

    /// SD 1.5 inpainting
    pub fn fallback() -> Self {
        Self {
            version: "c11bac58203367db93a3c552bd49a25a5418458ddffb7e90dae55780765e26d6"
                .to_string(),
            max_attempts: 60,
            num_inference_steps: 25,
            guidance_scale: 7.5,
            strength: None,
            scheduler: None,
        }
    }
}

/// Provider credentials, read from the process environment once at load time
#[derive(Clone, Default)]
pub struct Secrets {
    anthropic_api_key: Option<String>,
    replicate_api_key: Option<String>,
}

impl Secrets {
    pub fn new(anthropic_api_key: Option<String>, replicate_api_key: Option<String>) -> Self {
        Self {
            anthropic_api_key: anthropic_api_key.filter(|k| !k.trim().is_empty()),
            replicate_api_key: replicate_api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var(ANTHROPIC_KEY_VAR).ok(),
            std::env::var(REPLICATE_KEY_VAR).ok(),
        )
    }

    pub fn anthropic_api_key(&self) -> Option<&str> {
        self.anthropic_api_key.as_deref()
    }

    pub fn replicate_api_key(&self) -> Option<&str> {
        self.replicate_api_key.as_deref()
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |k: &Option<String>| if k.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Secrets")
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("replicate_api_key", &redact(&self.replicate_api_key))
            .finish()
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_str().ok_or_else(|| {
            AppError::Config(config::ConfigError::Message(
                "Configuration path is not valid UTF-8".to_string(),
            ))
        })?;

        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (e.g. WALL_COLOR__SERVER__PORT)
            .add_source(
                Environment::with_prefix("WALL_COLOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.secrets = Secrets::from_env();
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        let inpainting = &self.replicate.inpainting;
        let budgets = [
            ("segmentation", self.replicate.segmentation.max_attempts),
            ("inpainting.primary", inpainting.primary.max_attempts),
            ("inpainting.fallback", inpainting.fallback.max_attempts),
        ];
        for (name, attempts) in budgets {
            if attempts == 0 {
                return Err(invalid(&format!(
                    "replicate.{}.max_attempts must be at least 1",
                    name
                )));
            }
        }

        if self.server.max_body_bytes == 0 {
            return Err(invalid("server.max_body_bytes cannot be 0"));
        }

        let max_segments = self.replicate.segmentation.max_segments;
        if max_segments == 0 || max_segments > MAX_SEGMENTS {
            return Err(invalid(&format!(
                "replicate.segmentation.max_segments must be between 1 and {}",
                MAX_SEGMENTS
            )));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(&format!(
                "Invalid logging format '{}'. Must be 'json' or 'pretty'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
