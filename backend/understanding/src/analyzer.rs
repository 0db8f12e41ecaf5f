//! Deadline runner around a vision adapter.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tagforge_core::{AnalysisError, AnalysisResult, ImageBlob, VisionAdapter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs one adapter call under a hard deadline.
///
/// When the deadline elapses the adapter's token is cancelled and its future
/// dropped, so no late result can be delivered.
#[derive(Clone)]
pub struct Analyzer {
    adapter: Arc<dyn VisionAdapter>,
    timeout: Duration,
}

impl Analyzer {
    pub fn new(adapter: Arc<dyn VisionAdapter>, timeout: Duration) -> Self {
        Self { adapter, timeout }
    }

    pub fn provider_name(&self) -> &str {
        self.adapter.name()
    }

    /// Analyze `image`, failing with [`AnalysisError::Timeout`] past the
    /// deadline or [`AnalysisError::Cancelled`] when `parent` fires first.
    pub async fn analyze(
        &self,
        image: &ImageBlob,
        parent: Option<&CancellationToken>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let token = match parent {
            Some(p) => p.child_token(),
            None => CancellationToken::new(),
        };
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(AnalysisError::Cancelled),
            res = self.adapter.analyze(image, token.clone()) => res,
            _ = tokio::time::sleep(self.timeout) => {
                token.cancel();
                warn!(
                    provider = self.adapter.name(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Provider call exceeded deadline"
                );
                Err(AnalysisError::Timeout(self.timeout))
            }
        };

        debug!(
            provider = self.adapter.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = outcome.is_ok(),
            "Provider call finished"
        );
        outcome
    }
}
