//! Embedded-JSON extraction from prose.
//!
//! Models rarely return bare JSON; the object is usually surrounded by
//! commentary ("Here is what I found: {...} Let me know..."). This module
//! isolates the first balanced `{...}` span, tracking string literals and
//! escapes so braces inside values don't close the span early.

use serde_json::{Map, Value};

use crate::repair::repair_json;

/// Returns the offset of the first `{` and the candidate object span.
///
/// The span is the shortest balanced `{...}` prefix starting there. If the
/// object never closes (truncated output) the span runs to the end of the
/// text so the repair pass can append the missing closers. Only the first
/// candidate is considered; a second object later in the text is ignored.
fn candidate_object(text: &str) -> Option<(usize, &str)> {
    let start = text.find('{')?;
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in text[start..].char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, &text[start..=start + i]));
                }
            }
            _ => {}
        }
    }

    // Unterminated object: hand the tail to repair.
    Some((start, &text[start..]))
}

/// Extracts and parses the first embedded JSON object in `text`.
///
/// Returns the offset of the object's opening brace (so the caller can treat
/// the preceding prose as a preamble) and the parsed object. A candidate that
/// fails strict parsing is handed to [`repair_json`] and retried once.
#[must_use]
pub fn extract_embedded_object(text: &str) -> Option<(usize, Map<String, Value>)> {
    let (start, candidate) = candidate_object(text)?;

    let parsed: Option<Value> = match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(parse_err) => {
            tracing::debug!(error = %parse_err, "embedded candidate failed strict parse");
            repair_json(candidate)
                .and_then(|repaired| serde_json::from_str(&repaired).ok())
        }
    };

    match parsed {
        Some(Value::Object(map)) => Some((start, map)),
        _ => None,
    }
}

/// A parsed object only counts as a product-bearing result when it carries a
/// `products` sequence — or `posts`, for the deep-search prompt variant.
#[must_use]
pub fn has_product_sequence(obj: &Map<String, Value>) -> bool {
    obj.get("products").is_some_and(Value::is_array)
        || obj.get("posts").is_some_and(Value::is_array)
}
