//! `tagforge-config`: TagForge runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, provider selection + credentials, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment variable overrides (`AI_PROVIDER`, `OPENAI_API_KEY`, `PORT`, ...)
//! - Default value application
//! - Validation with warnings vs. fatal errors
//! - Redaction for safe logging/display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, resolve_env_vars, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_raw_config, resolve_config_path};
pub use redact::{redact, redacted_config};
pub use schema::{
    GeminiSettings, LoggingConfig, OllamaSettings, OpenAiSettings, ProviderConfig, ProviderKind,
    ServerConfig, TagForgeConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// A validated config plus the warnings found while building it.
///
/// Warnings are returned rather than logged so the caller can emit them once
/// its subscriber is installed.
#[derive(Debug)]
pub struct PreparedConfig {
    pub config: TagForgeConfig,
    pub warnings: Vec<ConfigValidationError>,
}

impl PreparedConfig {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
        }
    }
}

/// Load, substitute env vars, apply overrides and defaults, and validate.
///
/// This is the main entry point for loading a config at runtime. The result
/// is immutable for the lifetime of the process.
pub async fn load_and_prepare(path: &Path) -> Result<PreparedConfig> {
    let raw = load_raw_config(path).await?;
    prepare(raw, &std::env::vars().collect())
}

/// Turn a raw YAML value tree into a validated config using the given env.
///
/// The first validation error aborts; warnings are collected.
pub fn prepare(raw: Value, env: &HashMap<String, String>) -> Result<PreparedConfig> {
    let mut warnings = Vec::new();
    let value = resolve_env_vars(&raw, env, &mut warnings)
        .context("Failed to resolve env vars in config")?;

    let config: TagForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env, &mut warnings);
    let config = apply_all_defaults(config);

    let report = validate(&config);
    if !report.is_valid() {
        let summary: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!(summary.join("; "));
    }
    warnings.extend(report.warnings);

    Ok(PreparedConfig { config, warnings })
}
