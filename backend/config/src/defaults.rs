//! Config defaults: constants and the serde default functions that use them.

use crate::schema::TagForgeConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0";

pub const DEFAULT_PORT: u16 = 4000;

/// 10 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Hard deadline for one provider call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llava";

pub const DEFAULT_LOG_LEVEL: &str = "info";

pub(crate) fn bind_address() -> String {
    DEFAULT_BIND.to_string()
}

pub(crate) fn port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

pub(crate) fn timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn openai_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

pub(crate) fn openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

pub(crate) fn gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

pub(crate) fn gemini_base_url() -> String {
    DEFAULT_GEMINI_BASE_URL.to_string()
}

pub(crate) fn ollama_endpoint() -> String {
    DEFAULT_OLLAMA_ENDPOINT.to_string()
}

pub(crate) fn ollama_model() -> String {
    DEFAULT_OLLAMA_MODEL.to_string()
}

pub(crate) fn log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Fill blank strings left behind by YAML (`model: ""`) or env overrides.
pub fn apply_all_defaults(config: TagForgeConfig) -> TagForgeConfig {
    let config = apply_provider_defaults(config);
    apply_logging_defaults(config)
}

fn apply_provider_defaults(mut config: TagForgeConfig) -> TagForgeConfig {
    let p = &mut config.provider;
    fill_blank(&mut p.openai.model, DEFAULT_OPENAI_MODEL);
    fill_blank(&mut p.openai.base_url, DEFAULT_OPENAI_BASE_URL);
    fill_blank(&mut p.gemini.model, DEFAULT_GEMINI_MODEL);
    fill_blank(&mut p.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
    fill_blank(&mut p.ollama.model, DEFAULT_OLLAMA_MODEL);

    // Blank credentials mean "not configured".
    if p.openai.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        p.openai.api_key = None;
    }
    if p.gemini.api_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        p.gemini.api_key = None;
    }
    config
}

fn apply_logging_defaults(mut config: TagForgeConfig) -> TagForgeConfig {
    fill_blank(&mut config.logging.level, DEFAULT_LOG_LEVEL);
    if config.logging.dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        config.logging.dir = None;
    }
    config
}

fn fill_blank(field: &mut String, default: &str) {
    if field.trim().is_empty() {
        *field = default.to_string();
    }
}
