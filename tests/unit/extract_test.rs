//! Unit tests for pulling color recommendations out of model replies

use serde_json::Value;
use wall_color_gateway::response::colors::{parse_recommendations, DEFAULT_DESCRIPTION, DEFAULT_HEX};
use wall_color_gateway::response::extract::extract_json_array;
use wall_color_gateway::AppError;

const REPLY: &str = r##"[
  {"name": "Sea Salt (SW 6204)", "hex": "#CDD2CA", "description": "A calm green-gray."},
  {"name": "Naval (SW 6244)", "hex": "#2F3D4C", "description": "A deep, confident navy."},
  {"name": "Accessible Beige (SW 7036)", "hex": "#D1C7B8", "description": "A warm neutral."}
]"##;

fn is_rrggbb(hex: &str) -> bool {
    hex.len() == 7 && hex.starts_with('#') && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[test]
fn test_wrapping_does_not_change_result() {
    let plain: Value = serde_json::from_str(&extract_json_array(REPLY)).unwrap();

    let wrapped = [
        format!("```json\n{}\n```", REPLY),
        format!("```\n{}\n```", REPLY),
        format!("Here are my picks:\n{}\nEnjoy your new room!", REPLY),
        format!("Sure! ```json\n{}\n``` Let me know [if] you need more.", REPLY),
    ];

    for text in &wrapped {
        let parsed: Value = serde_json::from_str(&extract_json_array(text)).unwrap();
        assert_eq!(parsed, plain, "wrapping changed the result for {text:?}");
    }
}

#[test]
fn test_exactly_three_valid_entries() {
    let colors = parse_recommendations(REPLY).unwrap();

    assert_eq!(colors.len(), 3);
    for color in &colors {
        assert!(!color.name.is_empty());
        assert!(is_rrggbb(&color.hex), "bad hex {}", color.hex);
        assert!(!color.description.is_empty());
    }
    assert_eq!(colors[1].name, "Naval (SW 6244)");
}

#[test]
fn test_missing_fields_are_backfilled() {
    let reply = r##"[{"name": "Alabaster", "hex": "#EDEAE0", "description": "Soft white."}, {}, {"name": "Tricorn Black", "hex": "222"}]"##;
    let colors = parse_recommendations(reply).unwrap();

    assert_eq!(colors[1].name, "Color 2");
    assert_eq!(colors[1].hex, DEFAULT_HEX);
    assert_eq!(colors[1].description, DEFAULT_DESCRIPTION);
    assert_eq!(colors[2].name, "Tricorn Black");
    assert_eq!(colors[2].hex, DEFAULT_HEX);
}

#[test]
fn test_backfill_is_deterministic() {
    let reply = r#"[{}, {}]"#;
    assert_eq!(parse_recommendations(reply).unwrap(), parse_recommendations(reply).unwrap());
}

#[test]
fn test_short_and_long_replies_yield_three() {
    let short = r##"[{"name": "Alabaster", "hex": "#EDEAE0", "description": "Soft white."}]"##;
    let colors = parse_recommendations(short).unwrap();
    assert_eq!(colors.len(), 3);
    assert_eq!(colors[2].name, "Color 3");

    let long = r##"[{"name": "A"}, {"name": "B"}, {"name": "C"}, {"name": "D"}, {"name": "E"}]"##;
    let names: Vec<_> = parse_recommendations(long)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn test_hex_without_hash_is_accepted() {
    let colors = parse_recommendations(r#"[{"hex": "cdd2ca"}]"#).unwrap();
    assert_eq!(colors[0].hex, "#cdd2ca");
}

#[test]
fn test_unparseable_reply_keeps_raw_text() {
    let err = parse_recommendations("I'm sorry, I can't help with that.").unwrap_err();

    match err {
        AppError::MalformedReply { raw, parse_error, .. } => {
            assert_eq!(raw, "I'm sorry, I can't help with that.");
            assert!(parse_error.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_empty_array_is_rejected() {
    let err = parse_recommendations("```json\n[]\n```").unwrap_err();
    assert_eq!(err.to_string(), "Invalid color recommendations format");
}

#[test]
fn test_bracketed_prose_before_reply() {
    let expected = parse_recommendations(REPLY).unwrap();

    for prefix in ["I picked 3 colors [see below]:\n", "Top [3] picks:\n"] {
        let colors = parse_recommendations(&format!("{prefix}{REPLY}")).unwrap();
        assert_eq!(colors, expected, "prefix {prefix:?} changed the result");
    }
}

#[test]
fn test_bracketed_prose_without_reply_is_rejected() {
    let err = parse_recommendations("Top [3] picks coming soon").unwrap_err();
    assert!(matches!(err, AppError::MalformedReply { .. }));
}
