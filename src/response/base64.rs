//! Base64 data URL helpers

use base64::{engine::general_purpose::STANDARD, Engine};

/// Media type used for inpainted images
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Create a data URL from binary image data
pub fn create_data_url(data: &[u8], media_type: &str) -> String {
    format!("data:{};base64,{}", media_type, encode(data))
}
