//! Best-effort JSON recovery from free-form provider text.
//!
//! Vision models are asked for bare JSON but often wrap it in prose or
//! markdown fences. Strategies, in order:
//! 1. Strict parse of the whole (trimmed) text
//! 2. Greedy object: first `{` through last `}`
//! 3. Balanced object: first top-level brace-matched `{ ... }` that parses,
//!    string-aware, found in one linear pass
//! 4. Fallback: `{"tags": []}`
//!
//! Recovery (2 and 3) only looks at the first [`MAX_RECOVERY_BYTES`] of the
//! text. Parsing runs inline in the adapter future, so it must stay cheap.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::debug;

/// Far above any 10-tag reply; longer replies are truncated before recovery.
pub const MAX_RECOVERY_BYTES: usize = 32 * 1024;

static GREEDY_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Parse provider text into a JSON value. Never fails.
pub fn parse_provider_text(text: &str) -> Value {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return value;
    }

    let trimmed = truncate_at_char_boundary(trimmed, MAX_RECOVERY_BYTES);

    if let Some(m) = GREEDY_OBJECT.find(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(m.as_str()) {
            debug!("Recovered JSON object from surrounding text");
            return value;
        }
    }

    if let Some(value) = find_balanced_object(trimmed) {
        debug!("Recovered brace-matched JSON object");
        return value;
    }

    debug!(len = trimmed.len(), "No JSON found in provider response; using empty tags");
    empty_tags()
}

/// The payload used when nothing usable could be parsed.
pub fn empty_tags() -> Value {
    json!({ "tags": [] })
}

fn truncate_at_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// First top-level `{ ... }` span whose braces balance and which parses.
///
/// One pass: each byte is visited once and candidate spans never overlap,
/// so total work is linear in the text length. Quotes only open strings
/// inside an object, so stray quotes in surrounding prose are harmless.
fn find_balanced_object(text: &str) -> Option<Value> {
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Ok(value) = serde_json::from_str::<Value>(&text[start..=i]) {
                        return Some(value);
                    }
                }
            }
            _ => {}
        }
    }
    None
}
