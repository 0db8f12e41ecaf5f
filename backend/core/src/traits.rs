use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AnalysisError;
use crate::types::{AnalysisResult, ImageBlob};

/// A backend that turns an image into normalized tags.
///
/// Implementations must stop work and return promptly once `cancel` fires.
/// The deadline itself is enforced by the caller, not the adapter.
#[async_trait]
pub trait VisionAdapter: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Analyze one image and return normalized tags.
    async fn analyze(
        &self,
        image: &ImageBlob,
        cancel: CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError>;
}
