//! Verdict extraction from free-form evaluation responses.
//!
//! Models are asked to answer the "should you speak?" question with a JSON
//! object, but they wrap it in prose, markdown fences, or both. These
//! functions dig the object out. Pure domain logic, no I/O.
//!
//! # Extraction tiers
//!
//! | Tier | Strategy |
//! |------|----------|
//! | 1 | Parse the whole response as JSON |
//! | 2 | Parse the first ```json fenced block |
//! | 3 | Parse the first balanced `{...}` span |

use serde::{Deserialize, Serialize};

/// A model's self-evaluation verdict, as parsed from its response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakVerdict {
    pub should_speak: bool,
    pub confidence: f64,
    pub reason: String,
}

/// Extract a JSON object from a free-form model response.
///
/// Tries the three tiers in order and returns the first candidate that
/// parses as a JSON object. Returns `None` when no tier yields one.
pub fn extract_json_object(response: &str) -> Option<serde_json::Value> {
    let trimmed = response.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed)
        && value.is_object()
    {
        return Some(value);
    }

    if let Some(block) = fenced_json_block(response)
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(block)
        && value.is_object()
    {
        return Some(value);
    }

    if let Some(span) = balanced_object_span(response)
        && let Ok(value) = serde_json::from_str::<serde_json::Value>(span)
        && value.is_object()
    {
        return Some(value);
    }

    None
}

/// Parse a speak verdict out of a free-form evaluation response.
///
/// `should_speak` is required; `confidence` defaults to 0.5 and is clamped
/// to `[0.0, 1.0]`; `reason` defaults to empty. Returns `None` when no JSON
/// object can be extracted or `should_speak` is missing, letting the caller
/// fail open.
pub fn parse_speak_verdict(response: &str) -> Option<SpeakVerdict> {
    let value = extract_json_object(response)?;
    let should_speak = value.get("should_speak")?.as_bool()?;
    let confidence = value
        .get("confidence")
        .and_then(|v| v.as_f64())
        .unwrap_or(0.5)
        .clamp(0.0, 1.0);
    let reason = value
        .get("reason")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(SpeakVerdict {
        should_speak,
        confidence,
        reason,
    })
}

/// Contents of the first ```json fenced block, if any.
fn fenced_json_block(response: &str) -> Option<&str> {
    let start = response.find("```json")? + "```json".len();
    let rest = &response[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

/// The first balanced `{...}` span, tracking string literals so braces
/// inside quoted values (including escaped quotes) do not break matching.
fn balanced_object_span(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in response[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&response[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
