//! Analysis Event Logger
//!
//! One structured record per finished analysis request, written through
//! `tracing` under the `analysis_events` target so it lands in the NDJSON log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed { tag_count: usize },
    Rejected { code: String },
    Failed { kind: String, detail: String },
}

#[derive(Debug, Serialize)]
pub struct AnalysisEvent {
    pub request_id: String,
    pub provider: String,
    pub timestamp: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

impl AnalysisEvent {
    pub fn new(
        request_id: impl Into<String>,
        provider: impl Into<String>,
        elapsed_ms: u64,
        mut outcome: AnalysisOutcome,
    ) -> Self {
        if let AnalysisOutcome::Failed { detail, .. } = &mut outcome {
            *detail = redact_sensitive_data(detail);
        }
        Self {
            request_id: request_id.into(),
            provider: provider.into(),
            timestamp: Utc::now(),
            elapsed_ms,
            outcome,
        }
    }
}

pub struct EventLogger;

impl EventLogger {
    /// Emit the event; failures log at WARN, everything else at INFO.
    pub fn log_event(event: &AnalysisEvent) {
        let json = serde_json::to_string(event).unwrap_or_default();
        match &event.outcome {
            AnalysisOutcome::Failed { .. } => {
                warn!(target: "analysis_events", event = %json, "Analysis event")
            }
            _ => info!(target: "analysis_events", event = %json, "Analysis event"),
        }
    }
}
