//! Image understanding for TagForge: provider adapters, reply parsing,
//! tag normalization, provider selection, and the deadline runner.

pub mod analyzer;
pub mod normalize;
pub mod parser;
pub mod prompt;
pub mod selector;
pub mod vision;

pub use analyzer::Analyzer;
pub use normalize::normalize_tags;
pub use parser::parse_provider_text;
pub use selector::select_adapter;
pub use vision::{GeminiAdapter, MockAdapter, OllamaAdapter, OpenAiAdapter};
