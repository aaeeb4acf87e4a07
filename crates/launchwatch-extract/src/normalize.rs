//! Raw-output normalization.
//!
//! Model output routinely wraps its JSON in markdown code fences, and some
//! web frontends leak a literal "Copy" button label into the captured text.
//! Both confuse the balanced-object scanner, so they are stripped first.

/// Strips markdown fences and known copy-widget artifacts from raw task
/// output. Content lines are preserved byte-for-byte; only noise markers go.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    // Fence markers can share a line with content ("```json{...}").
    let defenced = raw.replace("```json", "").replace("```JSON", "").replace("```", "");

    let mut lines: Vec<&str> = Vec::new();
    for line in defenced.lines() {
        let trimmed = line.trim();
        // Lone language tags and copy-button artifacts.
        if trimmed.eq_ignore_ascii_case("json") || trimmed == "Copy" {
            continue;
        }
        lines.push(line);
    }
    lines.join("\n")
}
