//! Response handling module - Normalises provider output into response shapes

pub mod base64;
pub mod colors;
pub mod extract;

use serde::Serialize;
use serde_json::Value;

/// One detected surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub mask: Value,
    pub label: String,
    pub id: usize,
}

fn default_label(index: usize) -> String {
    format!("Surface {}", index + 1)
}

/// Convert segmentation output into at most `limit` segments, keeping the
/// provider's order.
///
/// The model returns either a plain list of masks or an object holding
/// `masks` alongside optional `labels`. Anything else yields no segments.
pub fn normalize_segments(output: &Value, limit: usize) -> Vec<Segment> {
    let (masks, labels) = match output {
        Value::Array(masks) => (masks, None),
        Value::Object(map) => match map.get("masks").and_then(Value::as_array) {
            Some(masks) => (masks, map.get("labels").and_then(Value::as_array)),
            None => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    masks
        .iter()
        .take(limit)
        .enumerate()
        .map(|(id, mask)| {
            let label = labels
                .and_then(|l| l.get(id))
                .and_then(Value::as_str)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_label(id));

            Segment {
                mask: mask.clone(),
                label,
                id,
            }
        })
        .collect()
}

/// URL of the first produced file: output is either the URL itself or a list
/// of URLs.
pub fn first_output_url(output: &Value) -> Option<&str> {
    let url = match output {
        Value::String(url) => Some(url.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    };
    url.filter(|url| !url.is_empty())
}
