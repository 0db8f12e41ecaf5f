//! TagForge runtime configuration schema.
//!
//! Typed for serde YAML/JSON deserialization. Every section has defaults, so
//! an empty file (or no file at all) yields a runnable offline config.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::defaults;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for TagForge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagForgeConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Vision provider selection and credentials
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "defaults::bind_address")]
    pub bind: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Largest accepted image, in bytes.
    #[serde(default = "defaults::max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind_address(),
            port: defaults::port(),
            max_upload_bytes: defaults::max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Known vision backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Ollama,
    Mock,
}

impl ProviderKind {
    /// Resolve a provider name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "gemini" => Some(Self::Gemini),
            "ollama" => Some(Self::Ollama),
            "mock" => Some(Self::Mock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Provider name: "openai" | "gemini" | "ollama" | "mock".
    /// Unknown or empty names fall back to "mock".
    #[serde(default)]
    pub name: String,

    /// Hard deadline for one provider call, in seconds.
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiSettings,

    #[serde(default)]
    pub gemini: GeminiSettings,

    #[serde(default)]
    pub ollama: OllamaSettings,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            timeout_secs: defaults::timeout_secs(),
            openai: OpenAiSettings::default(),
            gemini: GeminiSettings::default(),
            ollama: OllamaSettings::default(),
        }
    }
}

impl ProviderConfig {
    /// The provider this config resolves to, `Mock` when unrecognized.
    pub fn kind(&self) -> ProviderKind {
        ProviderKind::from_name(&self.name).unwrap_or(ProviderKind::Mock)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "defaults::openai_model")]
    pub model: String,

    #[serde(default = "defaults::openai_base_url")]
    pub base_url: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::openai_model(),
            base_url: defaults::openai_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "defaults::gemini_model")]
    pub model: String,

    #[serde(default = "defaults::gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: defaults::gemini_model(),
            base_url: defaults::gemini_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OllamaSettings {
    #[serde(default = "defaults::ollama_endpoint")]
    pub endpoint: String,

    #[serde(default = "defaults::ollama_model")]
    pub model: String,
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: defaults::ollama_endpoint(),
            model: defaults::ollama_model(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "defaults::log_level")]
    pub level: String,

    /// Directory for the rolling NDJSON log file; console only when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Emit console logs as JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
            dir: None,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_are_case_insensitive() {
        assert_eq!(ProviderKind::from_name("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::from_name("  GEMINI "), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::from_name("mock"), Some(ProviderKind::Mock));
        assert_eq!(ProviderKind::from_name("clarifai"), None);
    }

    #[test]
    fn unknown_or_empty_provider_resolves_to_mock() {
        let mut cfg = ProviderConfig::default();
        assert_eq!(cfg.kind(), ProviderKind::Mock);
        cfg.name = "something-else".into();
        assert_eq!(cfg.kind(), ProviderKind::Mock);
        cfg.name = "Ollama".into();
        assert_eq!(cfg.kind(), ProviderKind::Ollama);
    }

    #[test]
    fn empty_yaml_yields_defaults() {
        let cfg: TagForgeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.server.port, defaults::DEFAULT_PORT);
        assert_eq!(cfg.server.max_upload_bytes, defaults::DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(cfg.provider.timeout_secs, defaults::DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.provider.openai.model, defaults::DEFAULT_OPENAI_MODEL);
        assert!(cfg.provider.openai.api_key.is_none());
    }

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
server:
  port: 8081
  maxUploadBytes: 2048
provider:
  name: openai
  timeoutSecs: 5
  openai:
    apiKey: sk-test
    model: gpt-4o
"#;
        let cfg: TagForgeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.server.bind, defaults::DEFAULT_BIND);
        assert_eq!(cfg.server.max_upload_bytes, 2048);
        assert_eq!(cfg.provider.kind(), ProviderKind::OpenAi);
        assert_eq!(cfg.provider.timeout(), Duration::from_secs(5));
        assert_eq!(cfg.provider.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.provider.openai.base_url, defaults::DEFAULT_OPENAI_BASE_URL);
    }
}
