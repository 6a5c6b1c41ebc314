//! Anthropic messages API client

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error};

use crate::backend::traits::TextProvider;
use crate::config::AnthropicConfig;
use crate::error::{AppError, Result};

/// Text provider backed by the Anthropic messages API
pub struct AnthropicBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    api_version: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl AnthropicBackend {
    /// Create a new client from configuration
    pub fn new(config: &AnthropicConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_version: config.api_version.clone(),
        })
    }
}

#[async_trait]
impl TextProvider for AnthropicBackend {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(provider = "anthropic", model = %self.model, prompt_len = prompt.len(), "Sending messages request");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let details: Value =
                serde_json::from_str(&body).unwrap_or_else(|_| json!({ "raw": body }));
            error!(provider = "anthropic", status = %status, error = %details, "Messages request failed");

            let message = details
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            return Err(AppError::Upstream {
                message: format!("Anthropic API error: {}", message),
                debug: Some(details),
            });
        }

        let data: Value = serde_json::from_str(&body).map_err(|e| AppError::MalformedReply {
            message: "Invalid response from Anthropic API".to_string(),
            raw: body.clone(),
            parse_error: Some(e.to_string()),
        })?;

        match data.pointer("/content/0/text").and_then(Value::as_str) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(AppError::Upstream {
                message: "Invalid response from Anthropic API".to_string(),
                debug: Some(data),
            }),
        }
    }
}
