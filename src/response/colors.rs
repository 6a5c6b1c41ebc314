//! Color recommendation parsing and backfill

use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::response::extract::extract_json_array;

pub const RECOMMENDATION_COUNT: usize = 3;
pub const DEFAULT_HEX: &str = "#808080";
pub const DEFAULT_DESCRIPTION: &str = "A versatile color choice for your space.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorRecommendation {
    pub name: String,
    pub hex: String,
    pub description: String,
}

impl ColorRecommendation {
    /// Build the entry at `index`, filling anything missing with defaults
    pub fn from_value(index: usize, value: Option<&Value>) -> Self {
        let field = |key: &str| {
            value
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        Self {
            name: field("name")
                .map(str::to_string)
                .unwrap_or_else(|| format!("Color {}", index + 1)),
            hex: field("hex")
                .and_then(normalize_hex)
                .unwrap_or_else(|| DEFAULT_HEX.to_string()),
            description: field("description")
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string(),
        }
    }
}

/// Accept `#RRGGBB` or `RRGGBB`, anything else is rejected
pub fn normalize_hex(hex: &str) -> Option<String> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", digits))
    } else {
        None
    }
}

/// Parse the model's reply into exactly three recommendations
pub fn parse_recommendations(reply: &str) -> Result<Vec<ColorRecommendation>> {
    let text = extract_json_array(reply);

    let parsed: Value = serde_json::from_str(&text).map_err(|e| AppError::MalformedReply {
        message: "Failed to parse color recommendations".to_string(),
        raw: text.clone(),
        parse_error: Some(e.to_string()),
    })?;

    let entries = match parsed.as_array() {
        Some(entries) if entries.iter().any(Value::is_object) => entries,
        _ => {
            return Err(AppError::MalformedReply {
                message: "Invalid color recommendations format".to_string(),
                raw: text,
                parse_error: None,
            })
        }
    };

    Ok((0..RECOMMENDATION_COUNT)
        .map(|i| ColorRecommendation::from_value(i, entries.get(i)))
        .collect())
}
