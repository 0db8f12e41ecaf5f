//! Config file discovery and reading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the TagForge config directory.
/// Priority: `TAGFORGE_CONFIG_DIR` env > `~/.tagforge/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TAGFORGE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".tagforge"),
        None => PathBuf::from(".tagforge"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Resolve the config path: explicit path > `TAGFORGE_CONFIG` > config dir.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(path) = std::env::var("TAGFORGE_CONFIG") {
        return PathBuf::from(path);
    }
    config_file_path(&config_dir())
}

/// Load the raw YAML document as a JSON value tree.
///
/// Returns an empty object if the file doesn't exist (first run), so all
/// schema defaults apply.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_yaml(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// Parse YAML text into a JSON value; an empty document is an empty object.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    let value: Value = serde_yaml::from_str(raw)?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_empty_object() {
        assert_eq!(parse_yaml("").unwrap(), serde_json::json!({}));
        assert_eq!(parse_yaml("  \n").unwrap(), serde_json::json!({}));
    }

    #[test]
    fn parses_nested_yaml() {
        let v = parse_yaml("provider:\n  name: gemini\n").unwrap();
        assert_eq!(v["provider"]["name"], "gemini");
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_config_path(Some(Path::new("/tmp/custom.yaml")));
        assert_eq!(p, PathBuf::from("/tmp/custom.yaml"));
    }

    #[tokio::test]
    async fn missing_file_yields_empty_object() {
        let v = load_raw_config(Path::new("/nonexistent/tagforge/config.yaml"))
            .await
            .unwrap();
        assert_eq!(v, serde_json::json!({}));
    }
}
