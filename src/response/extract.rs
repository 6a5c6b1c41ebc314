//! Pull a JSON payload out of free-form model output

use serde_json::Value;

/// Remove markdown code fences such as ```` ```json ```` and ```` ``` ````.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        out.push_str(&rest[..start]);
        rest = &rest[start + 3..];

        // Drop a language tag directly after the fence
        if rest.get(..4).map_or(false, |tag| tag.eq_ignore_ascii_case("json")) {
            rest = &rest[4..];
        }
        rest = rest.trim_start();
    }
    out.push_str(rest);

    out.trim().to_string()
}

/// Balanced `[...]` span starting at byte offset `start`, skipping brackets
/// inside string literals.
fn balanced_span_at(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Every balanced `[...]` span in the text, one per opening bracket, in order
pub fn array_spans(text: &str) -> impl Iterator<Item = &str> {
    text.char_indices()
        .filter(|&(_, ch)| ch == '[')
        .filter_map(move |(start, _)| balanced_span_at(text, start))
}

/// Clean model output down to the text that should be parsed as JSON.
///
/// Prose may contain bracketed asides before the payload, so the first span
/// that parses as an array of objects wins. Otherwise the first balanced span
/// is returned, or the whole fence-stripped text when there is none, so the
/// parser error describes what the model actually said.
pub fn extract_json_array(text: &str) -> String {
    let cleaned = strip_code_fences(text);
    let mut first = None;

    for span in array_spans(&cleaned) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(span) {
            if items.iter().any(Value::is_object) {
                return span.to_string();
            }
        }
        first.get_or_insert(span);
    }

    first.map(str::to_string).unwrap_or(cleaned)
}
