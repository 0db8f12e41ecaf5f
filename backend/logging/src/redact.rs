//! Log Redaction
//!
//! Scrubs API keys and bearer tokens from strings prior to logging. Provider
//! error bodies sometimes echo the request, so they pass through here.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{16,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)|(AIza[0-9A-Za-z_\-]{20,})").unwrap()
});
static QUERY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]key=)[^&\s]+").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]");
    QUERY_KEY_RE.replace_all(&redacted, "${1}[REDACTED]").to_string()
}
