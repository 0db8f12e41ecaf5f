//! Maps the configured provider name to a vision adapter.

use std::sync::Arc;

use tagforge_config::{ProviderConfig, ProviderKind};
use tagforge_core::VisionAdapter;
use tracing::{info, warn};

use crate::vision::{GeminiAdapter, MockAdapter, OllamaAdapter, OpenAiAdapter};

/// Build the adapter for `config`. Absent or unknown names select the mock.
pub fn select_adapter(config: &ProviderConfig) -> Arc<dyn VisionAdapter> {
    let kind = match ProviderKind::from_name(&config.name) {
        Some(kind) => kind,
        None => {
            if !config.name.trim().is_empty() {
                warn!(provider = %config.name, "Unknown AI provider, falling back to mock");
            }
            ProviderKind::Mock
        }
    };

    info!(provider = %kind, "Selected vision provider");
    match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiAdapter::new(&config.openai)),
        ProviderKind::Gemini => Arc::new(GeminiAdapter::new(&config.gemini)),
        ProviderKind::Ollama => Arc::new(OllamaAdapter::new(&config.ollama)),
        ProviderKind::Mock => Arc::new(MockAdapter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> ProviderConfig {
        ProviderConfig {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(select_adapter(&named("OpenAI")).name(), "openai");
        assert_eq!(select_adapter(&named(" gemini ")).name(), "gemini");
        assert_eq!(select_adapter(&named("OLLAMA")).name(), "ollama");
        assert_eq!(select_adapter(&named("mock")).name(), "mock");
    }

    #[test]
    fn absent_or_unknown_falls_back_to_mock() {
        assert_eq!(select_adapter(&named("")).name(), "mock");
        assert_eq!(select_adapter(&named("claude-vision")).name(), "mock");
    }

    #[test]
    fn selection_does_not_require_credentials() {
        // Missing keys surface at call time, not at selection.
        let adapter = select_adapter(&named("openai"));
        assert_eq!(adapter.name(), "openai");
    }
}
