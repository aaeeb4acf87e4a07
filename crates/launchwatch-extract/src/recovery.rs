//! Last-resort recovery from execution transcripts.
//!
//! When a task dies mid-run the result fields hold nothing useful, but the
//! step log often mentions products the agent saw before failing. This path
//! mines those mentions with regex heuristics. Its output is best-effort:
//! results are flagged `recovered_from_logs` and should never be treated as
//! equivalent to structured extraction.

use std::sync::LazyLock;

use launchwatch_core::{EngagementMetrics, ExtractionResult, ExtractorSettings, ProductRecord};
use regex::Regex;
use serde_json::Value;

use crate::payload::{FieldValue, TaskPayload, TRANSCRIPT_FIELDS};

/// Name fragments that can never be product names: navigation verbs, UI
/// chrome, articles, and the hosts the search itself runs on.
const NAME_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "for", "with", "this", "that", "click", "clicked",
    "clicking", "scroll", "scrolling", "search", "searching", "loading", "error", "failed",
    "found", "step", "task", "result", "nitter", "twitter", "page", "post", "tweet", "user",
    "profile", "button", "link", "http", "https", "www", "login", "home", "next", "back",
];

static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    // Name captures are runs of capitalized words so trailing prose does not
    // leak in; keyword case-insensitivity stays scoped to the keyword.
    [
        // "Product: Foo" / "product - Foo"
        r#"(?i:product)\s*[:\-]\s*"?([A-Z][A-Za-z0-9.'&_-]*(?:\s+[A-Z][A-Za-z0-9.'&_-]*){0,3})"#,
        // "Foo is an AI tool that ..." / "Foo was a new app ..."
        r"\b([A-Z][A-Za-z0-9.'&_-]*(?:\s+[A-Z][A-Za-z0-9.'&_-]*){0,3})\s+(?:is|was)\s+(an?\s+[^.!?\n]{5,150})",
        // "Foo launched ..." / "Foo just launched"
        r"\b([A-Z][A-Za-z0-9.'&_-]*(?:\s+[A-Z][A-Za-z0-9.'&_-]*){0,3})\s+(?:just\s+)?launch(?:ed|es)\b",
        // "found: Foo" / "discovered Foo"
        r#"(?i:found|discovered)\s*:?\s+"?([A-Z][A-Za-z0-9.'&_-]*(?:\s+[A-Z][A-Za-z0-9.'&_-]*){0,3})"#,
        // "Foo - an AI assistant for X" (dash construction)
        r"(?m)^\s*([A-Z][A-Za-z0-9 .'&_]{1,49}?)\s+-\s+(.{10,200})$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Inline single-object JSON fragment mentioning a name key.
static JSON_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\{[^{}]*"name"[^{}]*\}"#).expect("valid regex"));

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)\]>"'}]+"#).expect("valid regex"));

static STATUS_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s/]*nitter[^\s]*/[^/\s]+/status/\d+").expect("valid regex")
});

/// Attempts to reconstruct an approximate product list from any available
/// execution transcript. Returns `None` when no candidate survives.
#[must_use]
pub fn recover_from_logs(
    payload: &TaskPayload<'_>,
    settings: &ExtractorSettings,
) -> Option<ExtractionResult> {
    let entries = gather_entries(payload);
    if entries.is_empty() {
        return None;
    }

    let mut products: Vec<ProductRecord> = Vec::new();
    for entry in &entries {
        for candidate in candidates_from_entry(entry, settings) {
            // Case-insensitive first-occurrence dedup across all entries.
            if !products
                .iter()
                .any(|existing| existing.dedup_key() == candidate.dedup_key())
            {
                products.push(candidate);
            }
        }
    }

    if products.is_empty() {
        return None;
    }

    let total_found = products.len();
    tracing::debug!(total_found, entries = entries.len(), "recovered products from transcript");
    Some(ExtractionResult {
        products,
        summary: format!("Recovered {total_found} product(s) from the task execution transcript."),
        note: "Extraction fell back to log recovery; product details are approximate and may be \
               incomplete."
            .to_string(),
        total_found,
        recovered_from_logs: true,
    })
}

/// Collects a flat sequence of transcript entry texts.
///
/// Transcript fields are tried first; a string field is segmented, a list
/// field contributes one entry per element. With no transcript at all, the
/// main content field is segmented instead.
fn gather_entries(payload: &TaskPayload<'_>) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();

    for name in TRANSCRIPT_FIELDS {
        match payload.field(name) {
            FieldValue::List(items) => {
                for item in items {
                    if let Some(text) = entry_text(item) {
                        entries.push(text);
                    }
                }
            }
            FieldValue::Text(s) => entries.extend(segment_text(s)),
            FieldValue::Object(_) | FieldValue::Absent => {}
        }
    }

    if entries.is_empty() {
        if let Some(text) = payload.first_text() {
            entries = segment_text(text);
        }
    }

    entries
}

/// Text content of one transcript element.
///
/// Objects contribute their known message-bearing keys; an object with none
/// is serialized whole so inline `"name"` fragments still reach the JSON
/// heuristic.
fn entry_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => {
            let mut parts: Vec<&str> = Vec::new();
            for key in ["message", "text", "content", "description", "action", "step", "result"] {
                if let Some(s) = obj.get(key).and_then(Value::as_str) {
                    parts.push(s);
                }
            }
            if parts.is_empty() {
                serde_json::to_string(item).ok()
            } else {
                Some(parts.join(" "))
            }
        }
        _ => None,
    }
}

/// Segments a monolithic transcript string into entries.
///
/// Tried in order: numbered list, `Step N:` headers, bullet/dash lines.
/// When none of those match, sentences — short fragments are discarded as
/// noise on that path.
fn segment_text(text: &str) -> Vec<String> {
    static SEGMENTERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [
            r"(?m)^\s*\d+[.)]\s+",
            r"(?im)^\s*step\s+\d+\s*:?",
            r"(?m)^\s*[•*-]\s+",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("valid regex"))
        .collect()
    });

    for re in SEGMENTERS.iter() {
        if re.find_iter(text).count() >= 2 {
            return re
                .split(text)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    text.split('.')
        .map(str::trim)
        .filter(|s| s.len() >= 10)
        .map(str::to_string)
        .collect()
}

/// Extracts zero or more product candidates from one transcript entry.
fn candidates_from_entry(entry: &str, settings: &ExtractorSettings) -> Vec<ProductRecord> {
    let mut candidates: Vec<ProductRecord> = Vec::new();

    if let Some((name, captured_desc)) = first_name_match(entry) {
        candidates.push(build_candidate(entry, &name, captured_desc.as_deref(), settings));
    }

    // Independently of the prose heuristics, an inline JSON fragment with a
    // name key is worth a candidate of its own.
    if let Some(record) = json_fragment_candidate(entry, settings) {
        candidates.push(record);
    }

    candidates
}

/// First prose pattern producing a valid name, plus its captured description
/// when the pattern carries one.
fn first_name_match(entry: &str) -> Option<(String, Option<String>)> {
    for re in NAME_PATTERNS.iter() {
        for caps in re.captures_iter(entry) {
            let Some(name) = caps.get(1).map(|m| m.as_str().trim()) else {
                continue;
            };
            if is_valid_product_name(name) {
                let description = caps.get(2).map(|m| m.as_str().trim().to_string());
                return Some((name.to_string(), description));
            }
        }
    }
    None
}

fn json_fragment_candidate(entry: &str, settings: &ExtractorSettings) -> Option<ProductRecord> {
    let fragment = JSON_FRAGMENT.find(entry)?;
    let mut record: ProductRecord = serde_json::from_str(fragment.as_str()).ok()?;
    if !is_valid_product_name(record.name.trim()) {
        return None;
    }

    // Fill fields the fragment left blank from the surrounding entry text.
    let fallback = build_candidate(entry, &record.name, None, settings);
    if record.description.is_empty() {
        record.description = fallback.description;
    }
    if record.url.is_empty() {
        record.url = fallback.url;
    }
    if record.category == ExtractorSettings::FALLBACK_CATEGORY {
        record.category = fallback.category;
    }
    if record.post_url.is_empty() {
        record.post_url = fallback.post_url;
    }
    Some(record)
}

/// Derives the full record for a name found in `entry`: category from the
/// keyword table, first non-search-host URL, engagement metric scans, post
/// link, and a description.
fn build_candidate(
    entry: &str,
    name: &str,
    captured_description: Option<&str>,
    settings: &ExtractorSettings,
) -> ProductRecord {
    let description = captured_description
        .map(str::to_string)
        .or_else(|| containing_sentence(entry, name))
        .unwrap_or_default();

    ProductRecord {
        name: name.to_string(),
        description,
        url: official_url(entry).unwrap_or_default(),
        category: settings.categorize(entry),
        metrics: scan_metrics(entry),
        post_url: status_link(entry).unwrap_or_default(),
        discovery_post: None,
        all_posts: Vec::new(),
    }
}

/// Validity filter for recovered names: 2–50 characters, not a bare number,
/// not punctuation, not a stopword, not a URL.
#[must_use]
pub fn is_valid_product_name(name: &str) -> bool {
    let name = name.trim();
    let char_count = name.chars().count();
    if !(2..=50).contains(&char_count) {
        return false;
    }
    if !name.chars().any(char::is_alphabetic) {
        // Pure numbers and pure punctuation both fail here.
        return false;
    }
    if name.contains("://") {
        return false;
    }
    let lower = name.to_lowercase();
    !NAME_STOPWORDS.contains(&lower.as_str())
}

/// First URL in the entry that is not on the search host itself.
fn official_url(entry: &str) -> Option<String> {
    URL_RE
        .find_iter(entry)
        .map(|m| m.as_str())
        .find(|url| {
            let lower = url.to_lowercase();
            !lower.contains("nitter") && !lower.contains("twitter")
        })
        .map(|url| url.trim_end_matches(['.', ',', ';']).to_string())
}

/// First URL shaped like a nitter status link.
fn status_link(entry: &str) -> Option<String> {
    STATUS_LINK_RE.find(entry).map(|m| m.as_str().to_string())
}

/// Scans for engagement counts near emoji or keyword markers, both
/// `12 likes` and `likes: 12` orders. Unmatched counters stay zero.
fn scan_metrics(entry: &str) -> EngagementMetrics {
    static LIKES: LazyLock<(Regex, Regex)> = LazyLock::new(|| count_res(r"likes?|❤️|♥"));
    static RETWEETS: LazyLock<(Regex, Regex)> =
        LazyLock::new(|| count_res(r"retweets?|reposts?|🔁"));
    static REPLIES: LazyLock<(Regex, Regex)> =
        LazyLock::new(|| count_res(r"repl(?:y|ies)|comments?|💬"));
    static VIEWS: LazyLock<(Regex, Regex)> = LazyLock::new(|| count_res(r"views?|👁"));

    EngagementMetrics {
        likes: scan_count(entry, &LIKES),
        retweets: scan_count(entry, &RETWEETS),
        replies: scan_count(entry, &REPLIES),
        views: match scan_count(entry, &VIEWS) {
            0 => None,
            n => Some(n),
        },
    }
}

/// Builds the (count-before-marker, marker-before-count) regex pair for one
/// metric's marker alternation.
fn count_res(markers: &str) -> (Regex, Regex) {
    let before = Regex::new(&format!(r"(?i)(\d[\d,]*)\s*(?:{markers})")).expect("valid regex");
    let after = Regex::new(&format!(r"(?i)(?:{markers})\s*[:\s]\s*(\d[\d,]*)")).expect("valid regex");
    (before, after)
}

fn scan_count(entry: &str, res: &(Regex, Regex)) -> u64 {
    let (before, after) = res;
    before
        .captures(entry)
        .or_else(|| after.captures(entry))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<u64>().ok())
        .unwrap_or(0)
}

/// The sentence of `entry` containing `name`, whitespace-normalized,
/// accepted only at 10–200 characters.
fn containing_sentence(entry: &str, name: &str) -> Option<String> {
    let name_lower = name.to_lowercase();
    entry
        .split(['.', '!', '?', '\n'])
        .find(|sentence| sentence.to_lowercase().contains(&name_lower))
        .map(|sentence| sentence.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|normalized| (10..=200).contains(&normalized.len()))
}
