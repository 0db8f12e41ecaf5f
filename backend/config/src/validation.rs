//! Config validation: checks with user-friendly messages.
//!
//! Errors abort startup. Warnings are logged; in particular a live provider
//! without credentials is only a warning, because the failure is reported
//! per request when that provider is actually invoked.

use crate::schema::{ProviderKind, TagForgeConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &TagForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_provider(config, &mut report);
    report
}

fn validate_server(config: &TagForgeConfig, report: &mut ValidationReport) {
    if config.server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    }
    if config.server.max_upload_bytes == 0 {
        report.error("server.maxUploadBytes", "Upload limit must be greater than zero");
    }
    if config.server.bind.trim().is_empty() {
        report.error("server.bind", "Bind address must not be empty");
    }
}

fn validate_provider(config: &TagForgeConfig, report: &mut ValidationReport) {
    let provider = &config.provider;

    if !provider.name.trim().is_empty() && ProviderKind::from_name(&provider.name).is_none() {
        report.warn(
            "provider.name",
            format!("Unknown provider {:?}; falling back to mock", provider.name),
        );
    }

    if provider.timeout_secs == 0 {
        report.warn(
            "provider.timeoutSecs",
            "Timeout of 0 seconds fails every live provider call",
        );
    }

    match provider.kind() {
        ProviderKind::OpenAi if provider.openai.api_key.is_none() => report.warn(
            "provider.openai.apiKey",
            "OpenAI selected but OPENAI_API_KEY is not set; analysis requests will fail",
        ),
        ProviderKind::Gemini if provider.gemini.api_key.is_none() => report.warn(
            "provider.gemini.apiKey",
            "Gemini selected but GEMINI_API_KEY is not set; analysis requests will fail",
        ),
        ProviderKind::Ollama if provider.ollama.endpoint.trim().is_empty() => report.warn(
            "provider.ollama.endpoint",
            "Ollama selected but no endpoint configured; analysis requests will fail",
        ),
        _ => {}
    }
}
