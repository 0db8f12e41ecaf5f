//! Structured logging components for TagForge.
//!
//! Handles subscriber setup, log redaction, and per-request analysis events.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{AnalysisEvent, AnalysisOutcome, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
