//! Listing form value parsing and the media presence policy.

use crate::error::CoreError;

/// Parse a `removeImages` / `removeVideos` style list.
///
/// Accepts a JSON array of strings, a single JSON string, or falls back to a
/// comma-separated list. Blank entries are dropped.
pub fn parse_reference_list(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Ok(serde_json::Value::String(s)) => split_comma_list(&s),
        _ => split_comma_list(raw),
    }
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Checkbox semantics for the `negotiable` form field.
pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Parse an optional decimal form value; blank means absent.
pub fn parse_decimal(field: &str, raw: &str) -> Result<Option<f64>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(CoreError::Validation(format!(
            "'{field}' must be a non-negative number, got '{raw}'"
        ))),
    }
}

/// Parse an optional non-negative whole number form value; blank means absent.
pub fn parse_count(field: &str, raw: &str) -> Result<Option<i32>, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<i32>() {
        Ok(v) if v >= 0 => Ok(Some(v)),
        _ => Err(CoreError::Validation(format!(
            "'{field}' must be a non-negative whole number, got '{raw}'"
        ))),
    }
}

/// A new listing needs at least one medium: an uploaded image, an uploaded
/// video, or an external video link.
pub fn ensure_media_present(
    image_count: usize,
    video_count: usize,
    video_link_count: usize,
) -> Result<(), CoreError> {
    if image_count + video_count + video_link_count == 0 {
        return Err(CoreError::Validation(
            "At least one image or video is required".into(),
        ));
    }
    Ok(())
}
