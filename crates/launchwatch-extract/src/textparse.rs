//! Line-oriented parsing of bullet-list text results.
//!
//! Two list conventions are recognized:
//!
//! - Convention A, section-based: a summary paragraph, a marker line such as
//!   "Products Found:", then `Name - Description (Category)` lines, then an
//!   optional trailing note ("All products are ...").
//! - Convention B, markdown list: `N. **Name** - Category (description)`.
//!
//! The marker phrases come from [`ExtractorSettings`] — they are artifacts
//! of one model's response style, not stable syntax.

use launchwatch_core::{ExtractionResult, ExtractorSettings, ProductRecord};
use regex::Regex;

/// Sections of a Convention A text result.
#[derive(Debug, Default)]
pub(crate) struct TextSections {
    pub summary: String,
    pub product_lines: Vec<String>,
    pub note: String,
}

/// Splits text into summary / product-list / note sections using the
/// configured marker phrases. Blank lines are dropped; the marker line
/// itself belongs to no section.
pub(crate) fn split_sections(text: &str, settings: &ExtractorSettings) -> TextSections {
    #[derive(PartialEq)]
    enum Section {
        Summary,
        Products,
        Note,
    }

    let mut current = Section::Summary;
    let mut summary_lines: Vec<&str> = Vec::new();
    let mut product_lines: Vec<String> = Vec::new();
    let mut note_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if settings
            .product_list_markers
            .iter()
            .any(|marker| line.contains(marker.as_str()))
        {
            current = Section::Products;
            continue;
        }
        if settings
            .note_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
        {
            current = Section::Note;
        }

        match current {
            Section::Summary => summary_lines.push(line),
            Section::Products => product_lines.push(line.to_string()),
            Section::Note => note_lines.push(line),
        }
    }

    TextSections {
        summary: summary_lines.join(" "),
        product_lines,
        note: note_lines.join(" "),
    }
}

/// Parses free text into products via Convention A, falling back to
/// Convention B when A yields nothing. Returns `None` when neither
/// convention produces a single record.
#[must_use]
pub fn parse_text_result(text: &str, settings: &ExtractorSettings) -> Option<ExtractionResult> {
    let sections = split_sections(text, settings);

    let mut products: Vec<ProductRecord> = sections
        .product_lines
        .iter()
        .filter_map(|line| parse_convention_a_line(line))
        .collect();

    if products.is_empty() {
        products = text
            .lines()
            .filter_map(|line| parse_convention_b_line(line.trim()))
            .collect();
    }

    if products.is_empty() {
        return None;
    }

    // The parsed count is authoritative here; a self-reported figure in the
    // prose may describe products the model never actually listed.
    let total_found = products.len();
    Some(ExtractionResult {
        products,
        summary: sections.summary,
        note: sections.note,
        total_found,
        recovered_from_logs: false,
    })
}

/// Parses the prose preceding an embedded JSON object for the
/// summary / note / self-reported-count triple.
///
/// Unlike [`parse_text_result`], the count here is taken from the text
/// itself ("Found 3 products matching...") since the product list lives in
/// the JSON that follows.
pub(crate) fn parse_preamble(
    text: &str,
    settings: &ExtractorSettings,
) -> (String, String, Option<usize>) {
    let sections = split_sections(text, settings);

    let count_re = Regex::new(r"(?i)\b(?:found|total[_\s]?found:?)\s*:?\s*(\d{1,4})\b|\b(\d{1,4})\s+(?:new\s+)?products?\b")
        .expect("valid regex");
    let total_found = count_re.captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<usize>().ok())
    });

    (sections.summary, sections.note, total_found)
}

/// Convention A: `Name - Description (Category)`.
///
/// The category is the content of the *last* parenthesized group; a line
/// with no parenthesis still parses, with the category defaulting to
/// `Other`. Leading list numbering and bullet markers are tolerated.
fn parse_convention_a_line(line: &str) -> Option<ProductRecord> {
    // Bold markers mean the line follows Convention B.
    if line.contains("**") {
        return None;
    }
    let line = strip_list_prefix(line);
    let (name, rest) = line.split_once(" - ")?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let rest = rest.trim();
    let (description, category) = match rest.rfind('(') {
        Some(open) if rest[open..].contains(')') => {
            let category = rest[open + 1..].trim_end_matches(')').trim();
            (rest[..open].trim(), category)
        }
        _ => (rest, ""),
    };

    Some(text_record(name, description, category))
}

/// Convention B: `N. **Name** - Category (description)`.
///
/// Only lines beginning with a digit and containing a `**` marker qualify.
fn parse_convention_b_line(line: &str) -> Option<ProductRecord> {
    if !line.chars().next().is_some_and(|c| c.is_ascii_digit()) || !line.contains("**") {
        return None;
    }

    let mut parts = line.splitn(3, "**");
    let _prefix = parts.next()?;
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    let rest = parts.next().unwrap_or("").trim();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim();

    let (category, description) = match rest.rfind('(') {
        Some(open) if rest[open..].contains(')') => {
            let description = rest[open + 1..].trim_end_matches(')').trim();
            (rest[..open].trim(), description)
        }
        _ => (rest, ""),
    };

    Some(text_record(name, description, category))
}

/// Drops leading `1.` / `2)` numbering and bullet markers from a line.
fn strip_list_prefix(line: &str) -> &str {
    let line = line.trim_start_matches(['-', '*', '•']).trim_start();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }
    line
}

/// Builds the canonical record shape for a text-parsed product: zeroed
/// metrics, no URLs, category defaulting to `Other`.
fn text_record(name: &str, description: &str, category: &str) -> ProductRecord {
    let category = if category.is_empty() {
        ExtractorSettings::FALLBACK_CATEGORY.to_string()
    } else {
        category.to_string()
    };
    ProductRecord {
        name: name.to_string(),
        description: description.to_string(),
        category,
        ..ProductRecord::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ExtractorSettings {
        ExtractorSettings::default()
    }

    #[test]
    fn convention_a_parses_marker_sectioned_list() {
        let text = "Products Found:\nFoo - A tool (Productivity)\nBar - Another tool\n";
        let result = parse_text_result(text, &settings()).expect("two products");
        assert_eq!(result.total_found, 2);
        assert_eq!(result.products[0].name, "Foo");
        assert_eq!(result.products[0].description, "A tool");
        assert_eq!(result.products[0].category, "Productivity");
        assert_eq!(result.products[1].name, "Bar");
        assert_eq!(result.products[1].description, "Another tool");
        assert_eq!(result.products[1].category, "Other");
    }

    #[test]
    fn convention_a_splits_at_last_parenthesis() {
        let text = "Products Found:\nFoo - A (really) good tool (Design)";
        let result = parse_text_result(text, &settings()).expect("one product");
        assert_eq!(result.products[0].description, "A (really) good tool");
        assert_eq!(result.products[0].category, "Design");
    }

    #[test]
    fn convention_a_collects_summary_and_note() {
        let text = "I searched for new AI launches.\nFound several candidates.\n\
                    Products Found:\nFoo - A tool (Productivity)\n\
                    All products are from independent startups.";
        let result = parse_text_result(text, &settings()).expect("parsed");
        assert_eq!(
            result.summary,
            "I searched for new AI launches. Found several candidates."
        );
        assert_eq!(result.note, "All products are from independent startups.");
        assert!(!result.recovered_from_logs);
    }

    #[test]
    fn convention_a_tolerates_numbered_product_lines() {
        let text = "Products Found:\n1. Foo - A tool (Productivity)\n2) Bar - Other tool (Design)";
        let result = parse_text_result(text, &settings()).expect("parsed");
        assert_eq!(result.products[0].name, "Foo");
        assert_eq!(result.products[1].name, "Bar");
    }

    #[test]
    fn convention_a_records_have_zeroed_metrics() {
        let text = "Products Found:\nFoo - A tool (Productivity)";
        let result = parse_text_result(text, &settings()).expect("parsed");
        let metrics = &result.products[0].metrics;
        assert_eq!((metrics.likes, metrics.retweets, metrics.replies), (0, 0, 0));
        assert!(result.products[0].url.is_empty());
        assert!(result.products[0].post_url.is_empty());
    }

    #[test]
    fn convention_b_parses_markdown_list() {
        let text = "Here are the launches I found:\n\
                    1. **Foo** - Productivity (an AI email assistant)\n\
                    2. **Bar** - Design (generates logos)";
        let result = parse_text_result(text, &settings()).expect("two products");
        assert_eq!(result.total_found, 2);
        assert_eq!(result.products[0].name, "Foo");
        assert_eq!(result.products[0].category, "Productivity");
        assert_eq!(result.products[0].description, "an AI email assistant");
        assert_eq!(result.products[1].category, "Design");
    }

    #[test]
    fn convention_b_without_parenthesis_keeps_remainder_as_category() {
        let text = "1. **Foo** - Productivity";
        let result = parse_text_result(text, &settings()).expect("parsed");
        assert_eq!(result.products[0].name, "Foo");
        assert_eq!(result.products[0].category, "Productivity");
        assert!(result.products[0].description.is_empty());
    }

    #[test]
    fn convention_b_defaults_category_to_other_when_nothing_follows() {
        let text = "1. **Foo**";
        let result = parse_text_result(text, &settings()).expect("parsed");
        assert_eq!(result.products[0].category, "Other");
    }

    #[test]
    fn unparseable_text_returns_none() {
        assert!(parse_text_result("nothing useful here", &settings()).is_none());
        assert!(parse_text_result("", &settings()).is_none());
    }

    #[test]
    fn total_found_overrides_self_reported_count() {
        // The prose claims 5, but only one line parses.
        let text = "Found 5 products.\nProducts Found:\nFoo - A tool (Other)";
        let result = parse_text_result(text, &settings()).expect("parsed");
        assert_eq!(result.total_found, 1);
    }

    #[test]
    fn preamble_extracts_summary_note_and_count() {
        let text = "Search completed. Found 3 products matching the criteria.\n\
                    The search was limited to the last month.";
        let (summary, note, total) = parse_preamble(text, &settings());
        assert!(summary.starts_with("Search completed."));
        assert_eq!(note, "The search was limited to the last month.");
        assert_eq!(total, Some(3));
    }

    #[test]
    fn preamble_without_count_returns_none() {
        let (_, _, total) = parse_preamble("Here is the JSON you asked for:", &settings());
        assert_eq!(total, None);
    }

    #[test]
    fn custom_markers_are_honored() {
        let custom = ExtractorSettings {
            product_list_markers: vec!["Discovered tools:".to_string()],
            ..ExtractorSettings::default()
        };
        let text = "Discovered tools:\nFoo - A tool (Productivity)";
        let result = parse_text_result(text, &custom).expect("parsed with custom marker");
        assert_eq!(result.products[0].name, "Foo");
    }
}
