//! Tag normalization: any provider JSON into `{"tags": [{label, confidence}]}`.
//!
//! Total over every `serde_json::Value`; malformed input yields fewer tags,
//! never an error.

use serde_json::{Map, Number, Value};
use tagforge_core::{AnalysisResult, Tag};

/// Accepted label fields, in priority order.
pub const LABEL_FIELDS: &[&str] = &["label", "name", "tag"];

/// Accepted confidence fields, in priority order.
pub const CONFIDENCE_FIELDS: &[&str] = &["confidence", "score", "prob"];

/// Normalize an arbitrary provider payload.
///
/// Items come from `raw` itself when it is an array, otherwise from its
/// `tags` array. Items without a usable label are dropped. Confidence falls
/// back to `0` when missing or not numeric and is clamped into `[0, 1]`.
/// Input order is kept; nothing is sorted or deduplicated.
pub fn normalize_tags(raw: &Value) -> AnalysisResult {
    let items: &[Value] = match raw {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("tags")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    let tags = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(normalize_item)
        .collect();

    AnalysisResult::new(tags)
}

fn normalize_item(item: &Map<String, Value>) -> Option<Tag> {
    let label = first_present(item, LABEL_FIELDS)
        .and_then(coerce_label)
        .unwrap_or_default();
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    let confidence = first_present(item, CONFIDENCE_FIELDS)
        .map(coerce_number)
        .unwrap_or(0.0);

    Some(Tag::new(label, confidence))
}

/// First field that exists and is not `null`. An empty string still counts
/// as present, so it shadows later synonyms.
fn first_present<'a>(item: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|f| item.get(*f))
        .find(|v| !v.is_null())
}

fn coerce_label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_label(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integral floats print without a fractional part (`1.0` reads as `"1"`).
fn number_label(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

/// Non-finite results are mapped to `0` by `Tag::new`.
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(true) => 1.0,
        Value::Bool(false) => 0.0,
        _ => f64::NAN,
    }
}
