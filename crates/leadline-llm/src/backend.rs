//! Runtime-selected provider

use async_trait::async_trait;
use leadline_domain::traits::LlmProvider;

use crate::{LlmError, MockProvider, OllamaProvider, OpenAiProvider};

/// One of the concrete providers, chosen at startup from configuration
pub enum LlmBackend {
    /// OpenAI-compatible chat completions
    OpenAi(OpenAiProvider),
    /// Local Ollama server
    Ollama(OllamaProvider),
    /// Canned responses
    Mock(MockProvider),
}

impl LlmBackend {
    /// Whether calls can succeed without further configuration
    pub fn is_configured(&self) -> bool {
        match self {
            LlmBackend::OpenAi(p) => p.is_configured(),
            LlmBackend::Ollama(_) | LlmBackend::Mock(_) => true,
        }
    }
}

#[async_trait]
impl LlmProvider for LlmBackend {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            LlmBackend::OpenAi(p) => p.generate(prompt).await,
            LlmBackend::Ollama(p) => p.generate(prompt).await,
            LlmBackend::Mock(p) => p.generate(prompt).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            LlmBackend::OpenAi(p) => p.model_name(),
            LlmBackend::Ollama(p) => p.model_name(),
            LlmBackend::Mock(p) => p.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delegates_to_mock() {
        let backend = LlmBackend::Mock(MockProvider::new("{}"));
        assert_eq!(backend.generate("p").await.unwrap(), "{}");
        assert_eq!(backend.model_name(), "mock");
        assert!(backend.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_openai() {
        let backend = LlmBackend::OpenAi(OpenAiProvider::openai("gpt-4o-mini", None));
        assert!(!backend.is_configured());
        assert_eq!(backend.model_name(), "gpt-4o-mini");
        assert!(matches!(
            backend.generate("p").await,
            Err(LlmError::NotConfigured(_))
        ));
    }
}
