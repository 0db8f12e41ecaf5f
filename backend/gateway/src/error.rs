//! HTTP error mapping for the analysis API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tagforge_core::{AnalysisError, UploadRejection};
use thiserror::Error;
use tracing::error;

pub const PROVIDER_UNAVAILABLE: &str = "PROVIDER_UNAVAILABLE";

/// Caller-facing error body: `{"error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Rejected(#[from] UploadRejection),

    #[error(transparent)]
    Failed(#[from] AnalysisError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(UploadRejection::OversizeUpload { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Rejected(_) => StatusCode::BAD_REQUEST,
            Self::Failed(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(rejection) => rejection.code(),
            Self::Failed(_) => PROVIDER_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Rejected(rejection) => rejection.to_string(),
            Self::Failed(err) => {
                // Provider details stay in the log.
                error!(kind = err.kind(), error = %err, "AI provider call failed");
                "AI provider unavailable".to_string()
            }
        };
        let body = ErrorResponse {
            error: message,
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn rejections_map_to_client_errors() {
        assert_eq!(ApiError::from(UploadRejection::MissingFile).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(UploadRejection::InvalidType("text/plain".into())).status(),
            StatusCode::BAD_REQUEST
        );
        let oversize = ApiError::from(UploadRejection::OversizeUpload { limit: 10 });
        assert_eq!(oversize.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(oversize.code(), "OVERSIZE_UPLOAD");
    }

    #[test]
    fn every_failure_is_bad_gateway() {
        let failures = [
            AnalysisError::Configuration("OPENAI_API_KEY is not set".into()),
            AnalysisError::Timeout(Duration::from_secs(25)),
            AnalysisError::Cancelled,
            AnalysisError::provider("openai", "HTTP 500"),
        ];
        for err in failures {
            let api = ApiError::from(err);
            assert_eq!(api.status(), StatusCode::BAD_GATEWAY);
            assert_eq!(api.code(), PROVIDER_UNAVAILABLE);
        }
    }
}
