//! Wall Color Gateway
//!
//! HTTP gateway that turns room questionnaires into paint color
//! recommendations, finds paintable surfaces in room photos and repaints
//! them, by driving hosted text and image models.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod response;

pub use error::{AppError, Result};

use std::sync::Arc;
use tracing::warn;

use crate::backend::{AnthropicBackend, JobProvider, ReplicateBackend, TextProvider};
use crate::config::{Settings, ANTHROPIC_KEY_VAR, REPLICATE_KEY_VAR};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<Settings>,
    /// Absent when the text provider's secret is not configured
    pub text_provider: Option<Arc<dyn TextProvider>>,
    /// Absent when the image provider's secret is not configured
    pub job_provider: Option<Arc<dyn JobProvider>>,
}

impl AppState {
    /// Build providers for every configured secret
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let text_provider: Option<Arc<dyn TextProvider>> =
            match settings.secrets.anthropic_api_key() {
                Some(key) => Some(Arc::new(AnthropicBackend::new(&settings.anthropic, key)?)),
                None => {
                    warn!("{} is not set; color recommendations will fail", ANTHROPIC_KEY_VAR);
                    None
                }
            };

        let job_provider: Option<Arc<dyn JobProvider>> =
            match settings.secrets.replicate_api_key() {
                Some(key) => Some(Arc::new(ReplicateBackend::new(&settings.replicate, key)?)),
                None => {
                    warn!("{} is not set; segmentation and inpainting will fail", REPLICATE_KEY_VAR);
                    None
                }
            };

        Ok(Self {
            settings: Arc::new(settings),
            text_provider,
            job_provider,
        })
    }

    pub fn text_provider(&self) -> Result<&dyn TextProvider> {
        self.text_provider
            .as_deref()
            .ok_or(AppError::MissingSecret {
                name: ANTHROPIC_KEY_VAR,
                hint: "Add it to the server environment and restart.",
            })
    }

    pub fn job_provider(&self) -> Result<&dyn JobProvider> {
        self.job_provider
            .as_deref()
            .ok_or(AppError::MissingSecret {
                name: REPLICATE_KEY_VAR,
                hint: "Add it to the server environment and restart.",
            })
    }
}
