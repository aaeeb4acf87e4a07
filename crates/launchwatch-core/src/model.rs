//! Canonical product-discovery record shapes.
//!
//! ## Observed upstream variance
//!
//! The browser-automation service echoes whatever its driving model emitted,
//! so structured results arrive with inconsistent field types:
//!
//! - Engagement counts may be JSON numbers (`"likes": 12`) or numeric
//!   strings (`"likes": "12"`), and are frequently absent. All count fields
//!   default to 0; `views` is optional because older prompt revisions did
//!   not request it.
//! - `total_found` may be self-reported by the model and disagree with the
//!   actual product count. We keep the self-reported figure when the source
//!   is a structured payload and override it with the real count when we
//!   parsed the list ourselves.
//! - The deep-search prompt variant returns a primary discovery post plus
//!   related posts per product; the quick variant returns neither. Both are
//!   optional and omitted from serialized output when absent.

use serde::{Deserialize, Deserializer, Serialize};

/// Per-post engagement counters as reported by the upstream page scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    #[serde(default, deserialize_with = "lenient_count")]
    pub likes: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub retweets: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub replies: u64,
    #[serde(
        default,
        deserialize_with = "lenient_opt_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub views: Option<u64>,
}

/// A post that evidenced a product discovery (deep-search variant only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryPost {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: String,
    /// Free-form timestamp string as scraped; upstream formats vary too much
    /// to parse into a typed datetime at this boundary.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub metrics: EngagementMetrics,
}

/// Canonical normalized representation of one discovered product.
///
/// `name` is the only required field and doubles as the case-insensitive
/// deduplication key. Every parser in the extraction pipeline produces this
/// exact shape, so downstream consumers never see parser-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Official site or demo link; empty when the source text carried none.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub metrics: EngagementMetrics,
    /// Link to the discovery evidence (the original post), or empty.
    #[serde(default)]
    pub post_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_post: Option<DiscoveryPost>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub all_posts: Vec<DiscoveryPost>,
}

impl ProductRecord {
    /// Case-insensitive trimmed name, used as the dedup key across parsers.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// The pipeline's single output shape.
///
/// Constructed fresh per task-result payload and immutable once returned.
/// `products` preserves discovery order. `recovered_from_logs` marks the
/// degraded-confidence path; treat those records as best-effort hints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub total_found: usize,
    #[serde(default)]
    pub recovered_from_logs: bool,
}

impl ExtractionResult {
    /// The canonical empty result returned when every strategy fails.
    ///
    /// Always a well-shaped value — callers can read `products`
    /// unconditionally.
    #[must_use]
    pub fn empty(summary: impl Into<String>) -> Self {
        Self {
            products: Vec::new(),
            summary: summary.into(),
            note: String::new(),
            total_found: 0,
            recovered_from_logs: false,
        }
    }
}

fn default_category() -> String {
    "Other".to_string()
}

/// Accepts a count as a JSON number or a numeric string.
///
/// Negative numbers and garbage strings deserialize to 0 rather than
/// failing the whole record — one bad counter must not discard a product.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_count(deserializer)?.unwrap_or(0))
}

fn lenient_opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Float(f64),
        Text(String),
        Null,
    }

    let parsed = match Option::<Raw>::deserialize(deserializer)? {
        None | Some(Raw::Null) => None,
        Some(Raw::Num(n)) => Some(u64::try_from(n).unwrap_or(0)),
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(Raw::Float(f)) => Some(if f.is_finite() && f >= 0.0 { f as u64 } else { 0 }),
        Some(Raw::Text(s)) => Some(s.trim().replace(',', "").parse::<u64>().unwrap_or(0)),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_accept_numeric_strings() {
        let m: EngagementMetrics =
            serde_json::from_str(r#"{"likes": "1,204", "retweets": 3, "replies": "7"}"#).unwrap();
        assert_eq!(m.likes, 1204);
        assert_eq!(m.retweets, 3);
        assert_eq!(m.replies, 7);
        assert!(m.views.is_none() || m.views == Some(0));
    }

    #[test]
    fn metrics_default_missing_fields_to_zero() {
        let m: EngagementMetrics = serde_json::from_str("{}").unwrap();
        assert_eq!(m, EngagementMetrics::default());
    }

    #[test]
    fn metrics_garbage_string_becomes_zero() {
        let m: EngagementMetrics = serde_json::from_str(r#"{"likes": "many"}"#).unwrap();
        assert_eq!(m.likes, 0);
    }

    #[test]
    fn product_record_defaults_category_to_other() {
        let p: ProductRecord = serde_json::from_str(r#"{"name": "Foo"}"#).unwrap();
        assert_eq!(p.category, "Other");
        assert!(p.description.is_empty());
        assert!(p.all_posts.is_empty());
    }

    #[test]
    fn product_record_dedup_key_is_case_insensitive_and_trimmed() {
        let p: ProductRecord = serde_json::from_str(r#"{"name": "  Notion AI "}"#).unwrap();
        assert_eq!(p.dedup_key(), "notion ai");
    }

    #[test]
    fn serialized_record_omits_absent_post_fields() {
        let p = ProductRecord {
            name: "Foo".to_string(),
            ..ProductRecord::default()
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("discovery_post"));
        assert!(!json.contains("all_posts"));
        assert!(!json.contains("views"));
    }

    #[test]
    fn empty_result_is_well_shaped() {
        let r = ExtractionResult::empty("nothing found");
        assert!(r.products.is_empty());
        assert_eq!(r.total_found, 0);
        assert!(!r.recovered_from_logs);
        assert_eq!(r.summary, "nothing found");
    }

    #[test]
    fn extraction_result_round_trips() {
        let r = ExtractionResult {
            products: vec![ProductRecord {
                name: "Foo".to_string(),
                category: "Productivity".to_string(),
                ..ProductRecord::default()
            }],
            summary: "one product".to_string(),
            note: String::new(),
            total_found: 1,
            recovered_from_logs: false,
        };
        let json = serde_json::to_string(&r).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
