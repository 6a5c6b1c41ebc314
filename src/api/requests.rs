//! Inbound request bodies, validation and outbound request builders

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::traits::JobRequest;
use crate::config::InpaintModelConfig;
use crate::error::{AppError, Result};

/// Questionnaire answers used to tailor color recommendations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Answers {
    pub surfaces_to_paint: Option<String>,
    pub room_type: Option<String>,
    pub lighting: Option<String>,
    pub light_bulbs: Option<String>,
    pub style: Option<String>,
    pub mood: Option<String>,
    pub existing_colors: Option<String>,
    pub avoid_colors: Option<String>,
    pub preference: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ColorRequest {
    pub answers: Option<Answers>,
}

impl ColorRequest {
    pub fn validate(self) -> Result<Answers> {
        self.answers
            .ok_or_else(|| AppError::InvalidRequest("No answers provided".to_string()))
    }
}

fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Prompt asking the text model for three paint colors as a JSON array
pub fn color_prompt(answers: &Answers) -> String {
    const UNSPECIFIED: &str = "Not specified";

    format!(
        r##"You are an expert interior designer and color consultant specializing in Sherwin Williams paints. Based on the following client information, recommend exactly 3 Sherwin Williams paint colors.

CLIENT INFORMATION:
- Surfaces to paint: {surfaces}
- Room type: {room}
- Natural lighting: {lighting}
- Light bulb type: {bulbs}
- Desired style: {style}
- Desired mood: {mood}
- Existing furniture/decor colors: {existing}
- Colors to avoid: {avoid}
- Tone preference: {preference}
- Additional notes: {notes}

REQUIREMENTS:
1. Provide exactly 3 different Sherwin Williams paint colors
2. Use REAL Sherwin Williams color names with their actual SW codes
3. Provide accurate hex codes that match the real Sherwin Williams colors
4. Each recommendation should work well with the client's existing decor
5. Consider how the color will look under their lighting conditions
6. Provide diverse options (e.g., one safe choice, one bold choice, one middle ground)

IMPORTANT: Respond ONLY with a valid JSON array, no additional text or markdown formatting.

Format your response exactly like this:
[
  {{
    "name": "Color Name (SW XXXX)",
    "hex": "#XXXXXX",
    "description": "2-3 sentences explaining why this color works for this space, considering the lighting, style, and existing decor."
  }},
  {{
    "name": "Color Name (SW XXXX)",
    "hex": "#XXXXXX",
    "description": "2-3 sentences explaining why this color works for this space."
  }},
  {{
    "name": "Color Name (SW XXXX)",
    "hex": "#XXXXXX",
    "description": "2-3 sentences explaining why this color works for this space."
  }}
]"##,
        surfaces = or_default(&answers.surfaces_to_paint, UNSPECIFIED),
        room = or_default(&answers.room_type, UNSPECIFIED),
        lighting = or_default(&answers.lighting, UNSPECIFIED),
        bulbs = or_default(&answers.light_bulbs, UNSPECIFIED),
        style = or_default(&answers.style, UNSPECIFIED),
        mood = or_default(&answers.mood, UNSPECIFIED),
        existing = or_default(&answers.existing_colors, UNSPECIFIED),
        avoid = or_default(&answers.avoid_colors, "None specified"),
        preference = or_default(&answers.preference, "No preference"),
        notes = or_default(&answers.additional_info, "None"),
    )
}

#[derive(Debug, Deserialize)]
pub struct SegmentRequest {
    pub image: Option<String>,
}

impl SegmentRequest {
    pub fn validate(self) -> Result<String> {
        self.image
            .filter(|i| !i.is_empty())
            .ok_or_else(|| AppError::InvalidRequest("No image provided".to_string()))
    }
}

/// Automatic mask generation job for the whole image
pub fn segmentation_job(version: &str, image: &str) -> JobRequest {
    JobRequest {
        version: version.to_string(),
        input: json!({
            "image": image,
            "points_per_side": 32,
            "pred_iou_thresh": 0.88,
            "stability_score_thresh": 0.95,
            "min_mask_region_area": 1000,
        }),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InpaintRequest {
    pub image: Option<String>,
    pub mask: Option<String>,
    pub color_name: Option<String>,
    pub color_hex: Option<String>,
}

/// Validated inpainting parameters
#[derive(Debug, Clone)]
pub struct InpaintTarget {
    pub image: String,
    pub mask: String,
    pub color_name: String,
    pub color_hex: Option<String>,
}

impl InpaintRequest {
    pub fn validate(self) -> Result<InpaintTarget> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (non_empty(self.image), non_empty(self.mask)) {
            (Some(image), Some(mask)) => Ok(InpaintTarget {
                image,
                mask,
                color_name: non_empty(self.color_name)
                    .unwrap_or_else(|| "the selected color".to_string()),
                color_hex: non_empty(self.color_hex),
            }),
            _ => Err(AppError::InvalidRequest(
                "Image and mask are required".to_string(),
            )),
        }
    }
}

impl InpaintTarget {
    fn color_label(&self, bracket_hex: bool) -> String {
        match (&self.color_hex, bracket_hex) {
            (Some(hex), true) => format!("{} ({})", self.color_name, hex),
            (Some(hex), false) => format!("{} {}", self.color_name, hex),
            (None, _) => self.color_name.clone(),
        }
    }
}

/// Which inpainting model a job is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InpaintTier {
    Primary,
    Fallback,
}

#[derive(Debug, Serialize)]
struct InpaintInput<'a> {
    image: &'a str,
    mask: &'a str,
    prompt: String,
    negative_prompt: &'static str,
    num_inference_steps: u32,
    guidance_scale: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduler: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_outputs: Option<u32>,
}

/// Inpainting job repainting the masked area in the target color
pub fn inpaint_job(
    model: &InpaintModelConfig,
    target: &InpaintTarget,
    tier: InpaintTier,
) -> Result<JobRequest> {
    let (prompt, negative_prompt, num_outputs) = match tier {
        InpaintTier::Primary => (
            format!(
                "Interior wall painted in {}, smooth matte paint finish, professional interior painting, same room architecture and furniture visible, photorealistic, high quality, natural lighting preserved",
                target.color_label(true)
            ),
            "different room, changed furniture, different architecture, glossy, shiny, wet paint, paint drips, uneven paint, brush strokes visible, low quality, blurry, distorted",
            Some(1),
        ),
        InpaintTier::Fallback => (
            format!(
                "wall painted {}, smooth matte interior paint, same room, photorealistic",
                target.color_label(false)
            ),
            "different room, glossy, wet, drips, low quality",
            None,
        ),
    };

    let input = InpaintInput {
        image: &target.image,
        mask: &target.mask,
        prompt,
        negative_prompt,
        num_inference_steps: model.num_inference_steps,
        guidance_scale: model.guidance_scale,
        strength: model.strength,
        scheduler: model.scheduler.as_deref(),
        num_outputs,
    };

    Ok(JobRequest {
        version: model.version.clone(),
        input: serde_json::to_value(input)?,
    })
}
