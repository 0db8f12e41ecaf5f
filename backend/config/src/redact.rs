//! Config redaction: produce safe-to-log config snapshots by masking credentials.

use serde_json::Value;

use crate::schema::TagForgeConfig;

/// Keys whose string values are secrets.
static SENSITIVE_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "accessToken",
    "access_token",
    "token",
    "secret",
    "password",
];

/// Redact a config JSON value, replacing sensitive fields with a short hint.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

/// Serialize and redact a typed config in one step.
pub fn redacted_config(config: &TagForgeConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact(&value),
        Err(_) => Value::Null,
    }
}

pub(crate) fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_string(s: &str, key: &str) -> Value {
    if is_sensitive_key(key) && !s.is_empty() {
        // Keep a 4-char prefix as a hint ("sk-p***"), never the body.
        let hint = if s.chars().count() > 8 {
            format!("{}***", s.chars().take(4).collect::<String>())
        } else {
            "***".to_string()
        };
        return Value::String(hint);
    }
    Value::String(s.to_string())
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) => redact_string(s, key),
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key() {
        let v = json!({ "provider": { "openai": { "apiKey": "sk-abcdef123456" } } });
        let redacted = redact(&v);
        let key = redacted["provider"]["openai"]["apiKey"].as_str().unwrap();
        assert_eq!(key, "sk-a***");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let v = json!({ "token": "abc" });
        assert_eq!(redact(&v)["token"], "***");
    }

    #[test]
    fn passthrough_non_sensitive() {
        let v = json!({ "logging": { "level": "debug" } });
        let redacted = redact(&v);
        assert_eq!(redacted["logging"]["level"], "debug");
    }

    #[test]
    fn typed_config_is_redacted() {
        let mut cfg = TagForgeConfig::default();
        cfg.provider.gemini.api_key = Some("AIzaSyVerySecretValue".into());
        let v = redacted_config(&cfg);
        assert_eq!(v["provider"]["gemini"]["apiKey"], "AIza***");
        assert_eq!(v["provider"]["gemini"]["model"], cfg.provider.gemini.model.as_str());
    }
}
