//! Vision provider adapters.
//!
//! Each adapter encodes the image inline, asks for the constrained tag JSON,
//! recovers JSON from the reply text, and normalizes it.

pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiAdapter;
pub use mock::MockAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

use base64::{engine::general_purpose::STANDARD, Engine};
use std::future::Future;
use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob};
use tokio_util::sync::CancellationToken;

use crate::normalize::normalize_tags;
use crate::parser::parse_provider_text;
use crate::prompt::DEFAULT_IMAGE_MIME;

/// Base64 payload and effective MIME type for an image.
pub(crate) fn encode_image(image: &ImageBlob) -> (String, &str) {
    let mime = match image.mime_type().trim() {
        "" => DEFAULT_IMAGE_MIME,
        mime => mime,
    };
    (STANDARD.encode(image.bytes()), mime)
}

/// Provider reply text to canonical tags. Malformed text yields no tags.
pub(crate) fn tags_from_text(text: &str) -> AnalysisResult {
    normalize_tags(&parse_provider_text(text))
}

/// Race `fut` against `cancel`; dropping `fut` aborts the in-flight request.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, AnalysisError>>,
) -> Result<T, AnalysisError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AnalysisError::Cancelled),
        res = fut => res,
    }
}

/// Read an error body for logging, bounded so a huge HTML page stays short.
pub(crate) async fn error_body(resp: reqwest::Response) -> String {
    let text = resp.text().await.unwrap_or_default();
    text.chars().take(500).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `app` on an ephemeral local port and return its base URL.
    pub async fn spawn_stub(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A loopback URL with nothing listening on it.
    pub async fn closed_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    pub fn png_blob() -> tagforge_core::ImageBlob {
        tagforge_core::ImageBlob::new(vec![0x89, b'P', b'N', b'G'], "image/png", "pixel.png")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn blank_mime_defaults_to_png() {
        let blob = ImageBlob::new(vec![1u8, 2, 3], "", "x");
        let (b64, mime) = encode_image(&blob);
        assert_eq!(mime, "image/png");
        assert_eq!(b64, "AQID");
    }

    #[test]
    fn garbage_text_yields_empty_tags() {
        assert!(tags_from_text("no json here, sorry").is_empty());
    }

    #[tokio::test]
    async fn cancellation_wins_over_pending_work() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let res: Result<(), _> = cancellable(&cancel, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(res, Err(AnalysisError::Cancelled)));
    }
}
