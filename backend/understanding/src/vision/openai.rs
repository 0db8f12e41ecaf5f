//! OpenAI chat-completions vision adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tagforge_config::OpenAiSettings;
use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob, VisionAdapter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::{cancellable, encode_image, error_body, tags_from_text};
use crate::prompt::{SYSTEM_PROMPT, TAG_PROMPT};

const PROVIDER: &str = "openai";

pub struct OpenAiAdapter {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiAdapter {
    pub fn new(settings: &OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn request(&self, api_key: &str, image: &ImageBlob) -> Result<String, AnalysisError> {
        let (b64, mime) = encode_image(image);
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": TAG_PROMPT },
                    { "type": "image_url",
                      "image_url": { "url": format!("data:{mime};base64,{b64}") } }
                ]}
            ]
        });

        debug!(model = %self.model, mime_type = mime, "Sending request to OpenAI");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = error_body(resp).await;
            return Err(AnalysisError::provider(PROVIDER, format!("HTTP {status}: {text}")));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, format!("invalid response: {e}")))?;

        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl VisionAdapter for OpenAiAdapter {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn analyze(
        &self,
        image: &ImageBlob,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AnalysisError::Configuration("OPENAI_API_KEY is not set".into()))?;

        info!(model = %self.model, size_bytes = image.len(), "[Vision] Tagging image via OpenAI");
        let text = cancellable(&cancel, self.request(api_key, image)).await?;
        Ok(tags_from_text(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::test_support::{closed_port_url, png_blob, spawn_stub};
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::Value;

    fn settings(base_url: &str, api_key: Option<&str>) -> OpenAiSettings {
        OpenAiSettings {
            api_key: api_key.map(str::to_string),
            model: "gpt-4o-mini".into(),
            base_url: base_url.into(),
        }
    }

    fn completion(content: &str) -> Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let adapter = OpenAiAdapter::new(&settings("http://127.0.0.1:9", None));
        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[tokio::test]
    async fn parses_and_normalizes_reply() {
        let app = Router::new().route(
            "/chat/completions",
            post(|Json(body): Json<Value>| async move {
                // The image travels inline as a data URI.
                let url = body["messages"][1]["content"][1]["image_url"]["url"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string();
                assert!(url.starts_with("data:image/png;base64,"));
                Json(completion(
                    "Here you go: {\"tags\":[{\"label\":\" cat \",\"confidence\":1.4},{\"label\":\"\"}]}",
                ))
            }),
        );
        let base = spawn_stub(app).await;
        let adapter = OpenAiAdapter::new(&settings(&base, Some("sk-test")));

        let result = adapter.analyze(&png_blob(), CancellationToken::new()).await.unwrap();
        assert_eq!(result.tags.len(), 1);
        assert_eq!(result.tags[0].label, "cat");
        assert_eq!(result.tags[0].confidence, 1.0);
    }

    #[tokio::test]
    async fn garbage_reply_yields_empty_tags() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { Json(completion("I'm sorry, I can't describe this image.")) }),
        );
        let base = spawn_stub(app).await;
        let adapter = OpenAiAdapter::new(&settings(&base, Some("sk-test")));

        let result = adapter.analyze(&png_blob(), CancellationToken::new()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn http_failure_is_provider_error() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        );
        let base = spawn_stub(app).await;
        let adapter = OpenAiAdapter::new(&settings(&base, Some("sk-test")));

        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        match err {
            AnalysisError::Provider { provider, message } => {
                assert_eq!(provider, "openai");
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_provider_error() {
        let adapter = OpenAiAdapter::new(&settings(&closed_port_url().await, Some("sk-test")));
        let err = adapter
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Provider { .. }));
    }
}
