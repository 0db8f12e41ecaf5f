//! Offline adapter returning a fixed tag set. No network, no credentials.

use async_trait::async_trait;
use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob, Tag, VisionAdapter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Deterministic adapter used when no live provider is configured.
#[derive(Debug, Default)]
pub struct MockAdapter;

impl MockAdapter {
    pub fn new() -> Self {
        Self
    }

    /// The tags every call returns.
    pub fn sample_tags() -> AnalysisResult {
        AnalysisResult::new(vec![
            Tag::new("Sample", 0.99),
            Tag::new("Object", 0.88),
            Tag::new("Scene", 0.77),
        ])
    }
}

#[async_trait]
impl VisionAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(
        &self,
        image: &ImageBlob,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        debug!(size_bytes = image.len(), "Mock provider returning sample tags");
        Ok(Self::sample_tags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::test_support::png_blob;

    #[tokio::test]
    async fn returns_sample_tags() {
        let result = MockAdapter::new()
            .analyze(&png_blob(), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(result, MockAdapter::sample_tags());
        assert_eq!(result.tags[0].label, "Sample");
        assert!(result.tags.iter().all(|t| (0.0..=1.0).contains(&t.confidence)));
    }

    #[tokio::test]
    async fn is_deterministic() {
        let adapter = MockAdapter::new();
        let a = adapter.analyze(&png_blob(), CancellationToken::new()).await.unwrap();
        let b = adapter.analyze(&png_blob(), CancellationToken::new()).await.unwrap();
        assert_eq!(a, b);
    }
}
