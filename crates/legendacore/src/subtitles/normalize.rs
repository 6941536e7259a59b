//! Caption payload → plain prose.
//!
//! Two wire formats are understood:
//! - `json3`: YouTube timed-text events, each with text segments
//! - anything else: treated as line-based WebVTT-like text

use serde::Deserialize;
use std::collections::HashSet;

use crate::core::config::captions::JSON3_EXT;
use crate::core::error::AppError;

#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Option<Vec<Json3Event>>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: Option<String>,
}

/// Converts a raw caption payload of the given format into a single line of text.
///
/// # Errors
///
/// Returns `MalformedPayload` when a `json3` payload is not a timed-text
/// document. The line-based path never fails.
pub fn normalize(extension: &str, raw: &str) -> Result<String, AppError> {
    if extension == JSON3_EXT {
        json3_to_text(raw)
    } else {
        Ok(vtt_to_text(raw))
    }
}

fn json3_to_text(raw: &str) -> Result<String, AppError> {
    // serde would accept `[]` as a struct; a timed-text document is always an object
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(AppError::MalformedPayload(
            "expected a timed-text JSON object at the top level".to_string(),
        ));
    }
    let payload: Json3Payload = serde_json::from_value(value)?;

    let parts: Vec<String> = payload
        .events
        .unwrap_or_default()
        .into_iter()
        .filter_map(|event| {
            let text: String = event
                .segs
                .unwrap_or_default()
                .into_iter()
                .filter_map(|seg| seg.utf8)
                .collect();
            let text = text.replace('\n', " ");
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect();

    Ok(parts.join(" "))
}

fn is_vtt_noise(line: &str) -> bool {
    let trimmed = line.trim();
    line.starts_with("WEBVTT")
        || line.starts_with("Kind:")
        || line.starts_with("Language:")
        || line.contains("-->")
        || trimmed.is_empty()
        || trimmed.chars().all(|c| c.is_ascii_digit())
}

fn vtt_to_text(raw: &str) -> String {
    let tag = lazy_regex::regex!(r"<[^>]+>");

    let mut seen = HashSet::new();
    let mut parts = Vec::new();

    for line in raw.lines().filter(|l| !is_vtt_noise(l)) {
        let text = tag.replace_all(line, "");
        let text = text.trim();
        // Rolling auto-captions repeat each line in two consecutive cues
        if !text.is_empty() && seen.insert(text.to_string()) {
            parts.push(text.to_string());
        }
    }

    parts.join(" ")
}
