//! Structured-field scanning over the result envelope.
//!
//! The automation service puts finished output under any of several field
//! names depending on API version and model. Each candidate field is tried
//! in priority order; within a field, embedded-JSON extraction runs before
//! a strict whole-value parse, and an already-structured mapping is accepted
//! verbatim. The first acceptable field ends the scan.

use launchwatch_core::{DiscoveryPost, ExtractionResult, ExtractorSettings, ProductRecord};
use serde_json::{Map, Value};

use crate::embedded::{extract_embedded_object, has_product_sequence};
use crate::normalize::normalize_text;
use crate::payload::{FieldValue, TaskPayload, RESULT_FIELDS};
use crate::textparse::parse_preamble;

/// Scans the payload's result fields for a structured product list.
///
/// Returns `None` when no field yields one — that is the normal "no
/// structured data" signal, not an error; control passes to the text parser.
#[must_use]
pub fn scan_structured_fields(
    payload: &TaskPayload<'_>,
    settings: &ExtractorSettings,
) -> Option<ExtractionResult> {
    for name in RESULT_FIELDS {
        match payload.field(name) {
            FieldValue::Text(raw) => {
                let text = normalize_text(raw);

                // (a) embedded object inside prose, with the prose before the
                // first `{` parsed as a preamble.
                if let Some((start, obj)) = extract_embedded_object(&text) {
                    if has_product_sequence(&obj) {
                        if let Some(mut result) = result_from_object(&obj) {
                            merge_preamble(&mut result, &obj, &text[..start], settings);
                            tracing::debug!(field = name, "accepted embedded JSON result");
                            return Some(result);
                        }
                    }
                }

                // (b) the whole field value is strict JSON.
                if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw.trim()) {
                    if obj.get("products").is_some_and(Value::is_array) {
                        if let Some(result) = result_from_object(&obj) {
                            tracing::debug!(field = name, "accepted whole-value JSON result");
                            return Some(result);
                        }
                    }
                }
            }
            // (c) already a mapping with a products key: accept verbatim.
            FieldValue::Object(obj) => {
                if obj.get("products").is_some_and(Value::is_array) {
                    if let Some(result) = result_from_object(obj) {
                        tracing::debug!(field = name, "accepted structured mapping result");
                        return Some(result);
                    }
                }
            }
            FieldValue::List(_) | FieldValue::Absent => {}
        }
    }
    None
}

/// Folds the preamble's summary / note / self-reported count into `result`
/// without overwriting anything the JSON object itself carried.
fn merge_preamble(
    result: &mut ExtractionResult,
    obj: &Map<String, Value>,
    preamble: &str,
    settings: &ExtractorSettings,
) {
    let (summary, note, total_found) = parse_preamble(preamble, settings);
    if result.summary.is_empty() {
        result.summary = summary;
    }
    if result.note.is_empty() {
        result.note = note;
    }
    if !obj.contains_key("total_found") {
        if let Some(total) = total_found {
            result.total_found = total;
        }
    }
}

/// Normalizes an accepted result object into the canonical shape.
///
/// Entries that fail deserialization or lack a name are skipped rather than
/// discarding the whole list. `posts` sequences (deep-search variant) are
/// folded into products carrying their discovery evidence.
pub(crate) fn result_from_object(obj: &Map<String, Value>) -> Option<ExtractionResult> {
    let products: Vec<ProductRecord> =
        if let Some(items) = obj.get("products").and_then(Value::as_array) {
            items
                .iter()
                .filter_map(|item| match serde_json::from_value::<ProductRecord>(item.clone()) {
                    Ok(record) if !record.name.trim().is_empty() => Some(record),
                    Ok(_) => None,
                    Err(e) => {
                        tracing::debug!(error = %e, "skipping malformed product entry");
                        None
                    }
                })
                .collect()
        } else if let Some(posts) = obj.get("posts").and_then(Value::as_array) {
            products_from_posts(posts)
        } else {
            return None;
        };

    let summary = string_field(obj, "summary");
    let note = string_field(obj, "note");
    let total_found = obj
        .get("total_found")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(products.len());

    Some(ExtractionResult {
        products,
        summary,
        note,
        total_found,
        recovered_from_logs: false,
    })
}

/// Deep-search variant: each post names the product it evidences. The post
/// itself becomes the record's `discovery_post`, and the post link its
/// `post_url`; `url` is reserved for the product's own site.
fn products_from_posts(posts: &[Value]) -> Vec<ProductRecord> {
    posts
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let name = obj
                .get("product_name")
                .or_else(|| obj.get("name"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())?;

            let post: DiscoveryPost = serde_json::from_value(item.clone()).unwrap_or_default();
            let description = string_field(obj, "description");
            let url = obj
                .get("product_url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let category = obj
                .get("category")
                .and_then(Value::as_str)
                .unwrap_or(ExtractorSettings::FALLBACK_CATEGORY)
                .to_string();

            Some(ProductRecord {
                name: name.to_string(),
                description,
                url,
                category,
                metrics: post.metrics.clone(),
                post_url: post.url.clone(),
                discovery_post: Some(post),
                all_posts: Vec::new(),
            })
        })
        .collect()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
