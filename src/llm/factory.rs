use super::compatible::{self, OpenAiCompatibleProvider};
use super::gemini::GeminiProvider;
use super::traits::Provider;
use crate::config::{ProposerBackend, ProposerConfig};
use std::sync::Arc;

/// Trimmed, non-empty API key from config.
fn resolve_api_key(config: &ProposerConfig) -> Option<&str> {
    config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Build the configured LLM backend.
///
/// `None` means no model is available: the rules backend was selected or no
/// API key is configured.
pub fn create_provider(config: &ProposerConfig) -> Option<Arc<dyn Provider>> {
    let api_key = resolve_api_key(config);
    match config.backend {
        ProposerBackend::Rules => None,
        ProposerBackend::Gemini => {
            let api_key = api_key?;
            let mut provider = GeminiProvider::new(Some(api_key), config.timeout_secs);
            if let Some(base_url) = config.base_url.as_deref() {
                provider = provider.with_base_url(base_url);
            }
            Some(Arc::new(provider))
        }
        ProposerBackend::OpenaiCompatible => {
            let api_key = api_key?;
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(compatible::DEFAULT_BASE_URL);
            Some(Arc::new(OpenAiCompatibleProvider::new(
                "openai-compatible",
                base_url,
                Some(api_key),
                config.timeout_secs,
            )))
        }
    }
}
