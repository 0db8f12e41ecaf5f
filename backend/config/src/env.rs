//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` substitution in YAML string values, resolved at load time.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Direct overrides from well-known variables (`AI_PROVIDER`, `PORT`, ...),
//!   applied after the file is parsed.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::redact::is_sensitive_key;
use crate::schema::TagForgeConfig;
use crate::validation::ConfigValidationError;

/// Matches `${VAR}` and the escaped form `$${VAR}`.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// An unset variable is an error, except under credential keys (`apiKey`,
/// `token`, ...), where the whole value becomes `null` and a warning is
/// recorded, so the missing credential fails only when that provider is used.
pub fn resolve_env_vars(
    value: &Value,
    env: &HashMap<String, String>,
    warnings: &mut Vec<ConfigValidationError>,
) -> Result<Value> {
    substitute_value(value, env, "", warnings)
}

fn substitute_value(
    value: &Value,
    env: &HashMap<String, String>,
    path: &str,
    warnings: &mut Vec<ConfigValidationError>,
) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]"), warnings))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                let resolved = match substitute_value(v, env, &child_path, warnings) {
                    Ok(resolved) => resolved,
                    Err(e) if is_sensitive_key(k) && v.is_string() => {
                        warnings.push(ConfigValidationError {
                            path: child_path,
                            message: format!("Credential not set, treating as absent ({e})"),
                        });
                        Value::Null
                    }
                    Err(e) => return Err(e),
                };
                result.insert(k.clone(), resolved);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        let var_name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                if error.is_none() {
                    error = Some(MissingEnvVarError {
                        var_name: var_name.to_string(),
                        config_path: path.to_string(),
                    });
                }
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply overrides from well-known variables in `env`.
///
/// Empty values are ignored; unparsable numbers are recorded as warnings
/// and ignored.
pub fn apply_env_overrides(
    mut config: TagForgeConfig,
    env: &HashMap<String, String>,
    warnings: &mut Vec<ConfigValidationError>,
) -> TagForgeConfig {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(v) = get("AI_PROVIDER") {
        config.provider.name = v.to_string();
    }
    if let Some(v) = parse_var(env, "AI_TIMEOUT_SECS", warnings) {
        config.provider.timeout_secs = v;
    }
    if let Some(v) = get("OPENAI_API_KEY") {
        config.provider.openai.api_key = Some(v.to_string());
    }
    if let Some(v) = get("OPENAI_MODEL") {
        config.provider.openai.model = v.to_string();
    }
    if let Some(v) = get("OPENAI_BASE_URL") {
        config.provider.openai.base_url = v.to_string();
    }
    if let Some(v) = get("GEMINI_API_KEY") {
        config.provider.gemini.api_key = Some(v.to_string());
    }
    if let Some(v) = get("GEMINI_MODEL") {
        config.provider.gemini.model = v.to_string();
    }
    if let Some(v) = get("OLLAMA_URL") {
        config.provider.ollama.endpoint = v.to_string();
    }
    if let Some(v) = get("OLLAMA_MODEL") {
        config.provider.ollama.model = v.to_string();
    }
    if let Some(v) = get("TAGFORGE_BIND") {
        config.server.bind = v.to_string();
    }
    if let Some(v) = parse_var(env, "PORT", warnings) {
        config.server.port = v;
    }
    if let Some(v) = parse_var(env, "MAX_UPLOAD_BYTES", warnings) {
        config.server.max_upload_bytes = v;
    }
    if let Some(v) = get("TAGFORGE_LOG_DIR") {
        config.logging.dir = Some(v.to_string());
    }
    if let Some(v) = parse_var(env, "TAGFORGE_LOG_JSON", warnings) {
        config.logging.json = v;
    }

    config
}

fn parse_var<T: std::str::FromStr>(
    env: &HashMap<String, String>,
    key: &str,
    warnings: &mut Vec<ConfigValidationError>,
) -> Option<T> {
    let raw = env.get(key)?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warnings.push(ConfigValidationError {
                path: key.to_string(),
                message: format!("Ignoring unparsable env override {raw:?}"),
            });
            None
        }
    }
}
