//! End-to-end tests for `extract_products`.
//!
//! Each test feeds a full task payload through the whole strategy chain and
//! checks the canonical result, the way the server consumes it. Unit-level
//! behavior of the individual strategies lives next to their modules.

use serde_json::json;

use launchwatch_core::{ExtractionResult, ExtractorSettings};
use launchwatch_extract::extract_products;

fn settings() -> ExtractorSettings {
    ExtractorSettings::default()
}

fn extract(payload: &serde_json::Value) -> ExtractionResult {
    extract_products(payload, &settings())
}

// ---------------------------------------------------------------------------
// Structured payloads
// ---------------------------------------------------------------------------

#[test]
fn well_formed_json_result_passes_through() {
    let payload = json!({
        "result": {
            "products": [{
                "name": "MailPilot",
                "description": "AI email triage",
                "url": "https://mailpilot.dev",
                "category": "Productivity",
                "metrics": {"likes": 12, "retweets": 3, "replies": 1},
                "post_url": "https://nitter.net/maker/status/1"
            }],
            "summary": "One launch found.",
            "total_found": 1
        }
    });
    let result = extract(&payload);
    assert_eq!(result.total_found, 1);
    let p = &result.products[0];
    assert_eq!(p.name, "MailPilot");
    assert_eq!(p.url, "https://mailpilot.dev");
    assert_eq!(p.metrics.likes, 12);
    assert_eq!(result.summary, "One launch found.");
    assert!(!result.recovered_from_logs);
}

#[test]
fn fenced_json_with_prose_wrapper_is_extracted() {
    let payload = json!({
        "result": "Here is what I found:\n```json\n{\"products\": [{\"name\": \"SketchGen\"}]}\n```\nLet me know if you need more."
    });
    let result = extract(&payload);
    assert_eq!(result.products[0].name, "SketchGen");
}

#[test]
fn truncated_json_is_repaired_and_extracted() {
    // Output cut off mid-object: missing string terminator and closers.
    let payload = json!({
        "output": r#"Search results: {"products": [{"name": "VoiceCraft", "url": "https://voicecr"#
    });
    let result = extract(&payload);
    assert_eq!(result.products[0].name, "VoiceCraft");
}

#[test]
fn metric_counts_survive_string_and_comma_forms() {
    let payload = json!({
        "result": {
            "products": [{
                "name": "Foo",
                "metrics": {"likes": "1,204", "retweets": 17, "replies": "3", "views": "12,000"}
            }]
        }
    });
    let m = &extract(&payload).products[0].metrics;
    assert_eq!(m.likes, 1204);
    assert_eq!(m.retweets, 17);
    assert_eq!(m.replies, 3);
    assert_eq!(m.views, Some(12_000));
}

// ---------------------------------------------------------------------------
// Text payloads
// ---------------------------------------------------------------------------

#[test]
fn sectioned_text_result_parses_with_summary_and_note() {
    let payload = json!({
        "result": "I searched the feed for AI launches.\n\
                   Products Found:\n\
                   Foo - An AI writing assistant (Text Generation)\n\
                   Bar - Another tool\n\
                   All products are recent launches."
    });
    let result = extract(&payload);
    assert_eq!(result.total_found, 2);
    assert_eq!(result.products[0].category, "Text Generation");
    // A line without a parenthesized category still parses.
    assert_eq!(result.products[1].name, "Bar");
    assert_eq!(result.products[1].category, "Other");
    assert_eq!(result.summary, "I searched the feed for AI launches.");
    assert_eq!(result.note, "All products are recent launches.");
}

#[test]
fn markdown_numbered_list_parses() {
    let payload = json!({
        "response": "Here are the launches:\n1. **Foo** - Design (generates logos)\n2. **Bar** - DevOps (ships infra)"
    });
    let result = extract(&payload);
    assert_eq!(result.total_found, 2);
    assert_eq!(result.products[0].description, "generates logos");
    assert_eq!(result.products[1].category, "DevOps");
}

// ---------------------------------------------------------------------------
// Log recovery
// ---------------------------------------------------------------------------

#[test]
fn failed_task_recovers_products_from_logs() {
    let payload = json!({
        "result": "Task failed: browser session timed out",
        "execution_logs": [
            "Step 3: EchoNote is an AI meeting summarizer for remote teams. https://echonote.app",
            "Step 4: session lost",
        ]
    });
    let result = extract(&payload);
    assert!(result.recovered_from_logs);
    assert_eq!(result.products[0].name, "EchoNote");
    assert_eq!(result.products[0].url, "https://echonote.app");
    assert!(result.note.contains("approximate"));
}

#[test]
fn duplicate_mentions_across_log_entries_collapse() {
    let payload = json!({
        "trace": [
            "Product: LensAI",
            "Found: LENSAI again in a later tweet",
        ]
    });
    let result = extract(&payload);
    assert_eq!(result.products.len(), 1);
}

// ---------------------------------------------------------------------------
// Degenerate payloads
// ---------------------------------------------------------------------------

#[test]
fn worthless_payload_never_panics_and_explains_itself() {
    for payload in [
        json!({}),
        json!(null),
        json!("bare string"),
        json!({"result": 42}),
        json!({"result": "no products mentioned anywhere"}),
    ] {
        let result = extract(&payload);
        assert!(result.products.is_empty(), "payload: {payload}");
        assert_eq!(result.total_found, 0);
    }
}

#[test]
fn structured_empty_result_keeps_its_note() {
    let payload = json!({
        "result": {"products": [], "summary": "Search ran clean.", "note": "No launches this week."}
    });
    let result = extract(&payload);
    assert!(result.products.is_empty());
    assert_eq!(result.note, "No launches this week.");
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn extraction_is_deterministic_across_runs() {
    let payload = json!({
        "result": "Found 2 products.\n{\"products\": [{\"name\": \"Foo\"}, {\"name\": \"Bar\"}],}",
        "logs": ["Product: Baz mentioned too"],
    });
    let first = serde_json::to_string(&extract(&payload)).expect("serializes");
    let second = serde_json::to_string(&extract(&payload)).expect("serializes");
    assert_eq!(first, second);
}
