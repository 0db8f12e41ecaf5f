use std::time::Duration;

use thiserror::Error;

/// Failure of a vision provider call.
///
/// Every variant is operator-facing; callers only ever see a generic
/// "provider unavailable" message.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("AI request timeout after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("AI request cancelled")]
    Cancelled,

    #[error("{provider} error: {message}")]
    Provider { provider: String, message: String },
}

impl AnalysisError {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Timeout(_) => "timeout",
            Self::Cancelled => "cancelled",
            Self::Provider { .. } => "provider",
        }
    }
}

/// Caller input errors detected while validating an upload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("no image was uploaded")]
    MissingFile,

    #[error("the uploaded file must be an image (got {0:?})")]
    InvalidType(String),

    #[error("the uploaded file exceeds the {limit} byte limit")]
    OversizeUpload { limit: usize },
}

impl UploadRejection {
    /// Stable condition code returned to the caller alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::OversizeUpload { .. } => "OVERSIZE_UPLOAD",
        }
    }
}
