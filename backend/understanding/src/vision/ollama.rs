//! Local Ollama `/api/generate` vision adapter (llava, minicpm-v, ...).

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tagforge_config::OllamaSettings;
use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob, VisionAdapter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{cancellable, encode_image, error_body, tags_from_text};
use crate::prompt::combined_prompt;

const PROVIDER: &str = "ollama";

pub struct OllamaAdapter {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaAdapter {
    pub fn new(settings: &OllamaSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.endpoint.trim().trim_end_matches('/').to_string(),
            model: settings.model.clone(),
        }
    }

    async fn request(&self, image: &ImageBlob) -> Result<String, AnalysisError> {
        let (b64, _) = encode_image(image);
        let body = json!({
            "model": self.model,
            "prompt": combined_prompt(),
            "images": [b64],
            "stream": false,
            "format": "json",
            "options": { "temperature": 0 },
        });

        let url = format!("{}/api/generate", self.endpoint);
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AnalysisError::provider(PROVIDER, format!("cannot reach {}: {e}", self.endpoint))
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = error_body(resp).await;
            return Err(AnalysisError::provider(PROVIDER, format!("HTTP {status}: {text}")));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, format!("invalid response: {e}")))?;

        Ok(json
            .get("response")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl VisionAdapter for OllamaAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn analyze(
        &self,
        image: &ImageBlob,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        if self.endpoint.is_empty() {
            return Err(AnalysisError::Configuration("OLLAMA_URL is not set".into()));
        }

        info!(model = %self.model, size_bytes = image.len(), "[Vision] Tagging image via Ollama");
        let text = cancellable(&cancel, self.request(image)).await?;
        Ok(tags_from_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::test_support::{closed_port_url, png_blob, spawn_stub};
    use axum::{http::StatusCode, routing::post, Json, Router};

    fn settings(endpoint: &str) -> OllamaSettings {
        OllamaSettings {
            endpoint: endpoint.into(),
            model: "llava".into(),
        }
    }

    #[tokio::test]
    async fn blank_endpoint_is_configuration_error() {
        let adapter = OllamaAdapter::new(&settings("  "));
        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[tokio::test]
    async fn parses_generate_response() {
        let app = Router::new().route(
            "/api/generate",
            post(|Json(body): Json<Value>| async move {
                let text = if body["format"] == "json" && body["images"].as_array().map(Vec::len) == Some(1) {
                    r#"{"tags":[{"label":"guitar","confidence":0.8}]}"#
                } else {
                    ""
                };
                Json(json!({ "model": "llava", "response": text, "done": true }))
            }),
        );
        let base = spawn_stub(app).await;
        let adapter = OllamaAdapter::new(&settings(&format!("{base}/")));

        let result = adapter.analyze(&png_blob(), CancellationToken::new()).await.unwrap();
        assert_eq!(result.tags.len(), 1);
        assert_eq!(result.tags[0].label, "guitar");
    }

    #[tokio::test]
    async fn model_not_found_is_provider_error() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::NOT_FOUND, r#"{"error":"model 'llava' not found"}"#) }),
        );
        let base = spawn_stub(app).await;
        let adapter = OllamaAdapter::new(&settings(&base));

        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AnalysisError::Provider { provider, message } => {
                assert_eq!(provider, "ollama");
                assert!(message.contains("404"));
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let app = Router::new().route(
            "/api/generate",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "out of memory") }),
        );
        let base = spawn_stub(app).await;
        let adapter = OllamaAdapter::new(&settings(&base));

        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Provider { .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_provider_error() {
        let adapter = OllamaAdapter::new(&settings(&closed_port_url().await));
        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AnalysisError::Provider { message, .. } => assert!(message.contains("cannot reach")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
