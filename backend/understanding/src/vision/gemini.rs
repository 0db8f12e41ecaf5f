//! Google Gemini `generateContent` vision adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tagforge_config::GeminiSettings;
use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob, VisionAdapter};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{cancellable, encode_image, error_body, tags_from_text};
use crate::prompt::{SYSTEM_PROMPT, TAG_PROMPT};

const PROVIDER: &str = "gemini";

pub struct GeminiAdapter {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(settings: &GeminiSettings) -> Self {
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
            "systemInstruction": { "parts": [ { "text": SYSTEM_PROMPT } ] },
            "contents": [{ "parts": [
                { "text": TAG_PROMPT },
                { "inlineData": { "mimeType": mime, "data": b64 } }
            ]}],
            "generationConfig": {
                "temperature": 0,
                "responseMimeType": "application/json"
            }
        });

        // Key goes in a header so it never shows up in a logged URL.
        let resp = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let text = error_body(resp).await;
            return Err(AnalysisError::provider(PROVIDER, format!("HTTP {status}: {text}")));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| AnalysisError::provider(PROVIDER, format!("invalid response: {e}")))?;

        Ok(json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string())
    }
}

#[async_trait]
impl VisionAdapter for GeminiAdapter {
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
            .ok_or_else(|| AnalysisError::Configuration("GEMINI_API_KEY is not set".into()))?;

        info!(model = %self.model, size_bytes = image.len(), "[Vision] Tagging image via Gemini");
        let text = cancellable(&cancel, self.request(api_key, image)).await?;
        Ok(tags_from_text(&text))
    }
}
