//! Top-level extraction entry point.
//!
//! Strategies run strictly in order of trustworthiness: structured fields,
//! then text-pattern parsing, then log recovery. The first strategy that
//! yields products wins. Whatever happens, the caller always gets a canonical
//! result; a task payload can be worthless, never fatal.

use launchwatch_core::{ExtractionResult, ExtractorSettings};
use serde_json::Value;

use crate::normalize::normalize_text;
use crate::payload::{FieldValue, TaskPayload, RESULT_FIELDS};
use crate::recovery::recover_from_logs;
use crate::scanner::scan_structured_fields;
use crate::textparse::parse_text_result;

/// Extracts a canonical product list from a raw task payload.
///
/// Never fails: when every strategy comes up empty the result is an empty
/// list with a summary explaining so.
#[must_use]
pub fn extract_products(payload: &Value, settings: &ExtractorSettings) -> ExtractionResult {
    let payload = TaskPayload::new(payload);

    // A structured result with an empty product list is kept aside: it is a
    // genuine "the agent found nothing" answer with its own note, preferable
    // to the generic empty result, but the weaker strategies still get a
    // chance to find products the structured path missed.
    let mut structured_empty: Option<ExtractionResult> = None;

    if let Some(result) = scan_structured_fields(&payload, settings) {
        if result.products.is_empty() {
            tracing::debug!("structured result has no products, trying weaker strategies");
            structured_empty = Some(result);
        } else {
            tracing::info!(count = result.products.len(), "extracted via structured fields");
            return result;
        }
    }

    for name in RESULT_FIELDS {
        if let FieldValue::Text(raw) = payload.field(name) {
            let text = normalize_text(raw);
            if let Some(result) = parse_text_result(&text, settings) {
                tracing::info!(
                    field = name,
                    count = result.products.len(),
                    "extracted via text patterns"
                );
                return result;
            }
        }
    }

    if let Some(result) = recover_from_logs(&payload, settings) {
        tracing::info!(count = result.products.len(), "extracted via log recovery");
        return result;
    }

    if let Some(result) = structured_empty {
        tracing::info!("task reported a structured empty result");
        return result;
    }

    tracing::info!("no extraction strategy produced products");
    ExtractionResult::empty(
        "The task completed but no product information could be extracted from its output.",
    )
}
