//! Best-effort JSON repair for common model-output defects.
//!
//! Observed failure modes, in the order the passes run:
//!
//! 1. Truncated string values — the model ran out of step budget mid-URL and
//!    emitted `"https://exa..."`. The value is unusable; blank it.
//! 2. Unbalanced closures — output cut off before the closing `]`/`}`.
//!    Append the missing closers (and a closing quote for an unterminated
//!    string) by replaying the delimiter stack.
//! 3. Trailing commas before a closer.
//! 4. Bare object keys (`{name: "x"}`).
//!
//! Pass order matters: blanking ellipsis values can remove stray quotes that
//! would otherwise corrupt the delimiter scan, and closers must be in place
//! before the trailing-comma and key passes see the text. Repair is advisory:
//! the caller re-parses and falls through to the next strategy on failure.

use regex::Regex;

/// Attempts to repair a string that failed strict JSON parsing.
///
/// Returns the corrected string, or `None` when no heuristic applied —
/// re-parsing the same text would be pointless.
#[must_use]
pub fn repair_json(broken: &str) -> Option<String> {
    let mut repaired = broken.trim().to_string();
    let mut changed = false;

    // Pass 1: blank string values containing a truncation ellipsis.
    let ellipsis_value =
        Regex::new(r#"(?s):\s*"[^"]*(?:\.\.\.|…)[^"]*""#).expect("valid regex");
    if ellipsis_value.is_match(&repaired) {
        repaired = ellipsis_value.replace_all(&repaired, r#": """#).into_owned();
        changed = true;
    }

    // Pass 2: append missing closers.
    if let Some(closers) = missing_closers(&repaired) {
        repaired.push_str(&closers);
        changed = true;
    }

    // Pass 3: trailing commas immediately before a closer.
    let trailing_comma = Regex::new(r",\s*([}\]])").expect("valid regex");
    if trailing_comma.is_match(&repaired) {
        repaired = trailing_comma.replace_all(&repaired, "$1").into_owned();
        changed = true;
    }

    // Pass 4: quote bare identifier keys.
    let bare_key = Regex::new(r"([{,]\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").expect("valid regex");
    if bare_key.is_match(&repaired) {
        repaired = bare_key.replace_all(&repaired, "$1\"$2\":").into_owned();
        changed = true;
    }

    changed.then_some(repaired)
}

/// Replays the delimiter stack outside string literals and returns the
/// closers the text is missing, or `None` when counts already balance.
///
/// An unterminated string literal gets its closing quote prepended to the
/// closer sequence. Mismatched closers (`[42}`) just pop the stack — this is
/// a repair heuristic, not a validator.
fn missing_closers(s: &str) -> Option<String> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escape = false;

    for c in s.chars() {
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
            '{' | '[' => stack.push(c),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }

    if !in_string && stack.is_empty() {
        return None;
    }

    let mut closers = String::new();
    if in_string {
        closers.push('"');
    }
    for opener in stack.iter().rev() {
        closers.push(if *opener == '{' { '}' } else { ']' });
    }
    Some(closers)
}
