//! Core Pipeline implementation

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{ExtractionError, PipelineError};
use crate::parser::{interpret, RawExtraction};
use crate::prompt::PromptBuilder;
use crate::types::ProcessingResult;
use chrono::Utc;
use leadline_domain::traits::{LeadStore, LlmProvider, PiiDetector};
use leadline_domain::{normalize, CanonicalLead, LeadId, LeadStats, PiiSpan, StoredLead};
use std::fmt::Display;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Pipeline turns a meeting summary into a canonical lead
///
/// PII detection, extraction, normalization, scoring and persistence run
/// in sequence for each summary. Collaborators are injected at
/// construction and shared across concurrent calls.
pub struct Pipeline<P, L, S> {
    detector: Arc<P>,
    llm_provider: Arc<L>,
    store: Arc<S>,
    config: PipelineConfig,
}

impl<P, L, S> Pipeline<P, L, S>
where
    P: PiiDetector + Send + Sync + 'static,
    L: LlmProvider + Send + Sync,
    S: LeadStore + Send + Sync + 'static,
    P::Error: Display,
    L::Error: Display,
    S::Error: Display,
{
    /// Create a new Pipeline
    pub fn new(detector: P, llm_provider: L, store: S, config: PipelineConfig) -> Self {
        Self {
            detector: Arc::new(detector),
            llm_provider: Arc::new(llm_provider),
            store: Arc::new(store),
            config,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Name of the extraction model
    pub fn model_name(&self) -> &str {
        self.llm_provider.model_name()
    }

    /// Process one meeting summary
    ///
    /// Extraction failures come back as `Ok` with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::InvalidInput` for a blank or oversized
    /// summary, before any collaborator is called.
    pub async fn process(&self, summary: &str) -> Result<ProcessingResult, PipelineError> {
        let summary = self.validate_input(summary)?;

        info!("Processing summary ({} chars)", summary.chars().count());

        let pii = self.detect_pii(summary).await;
        info!("Detected {} PII spans", pii.len());

        let raw = match self.extract(summary).await {
            Ok(raw) => raw,
            Err(e) => return Ok(self.handle_extraction_failure(pii, e).await),
        };

        let mut normalized = normalize(&raw.into_value());
        normalized.pii = pii;
        let lead = CanonicalLead::new(normalized, Utc::now());

        info!("Normalized lead with confidence {:.2}", lead.confidence);

        let warning = match self.persist(lead.clone()).await {
            Ok(id) => {
                info!("Persisted lead {}", id);
                None
            }
            Err(e) => {
                warn!("Failed to persist lead: {}", e);
                Some(format!("Lead was not saved: {}", e))
            }
        };

        Ok(ProcessingResult::succeeded(lead, warning))
    }

    /// Stored leads, most recent first
    pub async fn list_leads(&self, limit: Option<usize>) -> Result<Vec<StoredLead>, PipelineError> {
        self.with_store(move |store| store.list(limit)).await
    }

    /// Aggregate statistics over stored leads
    pub async fn stats(&self) -> Result<LeadStats, PipelineError> {
        self.with_store(|store| store.stats()).await
    }

    /// Delete every stored lead, returning how many were removed
    pub async fn clear(&self) -> Result<u64, PipelineError> {
        let deleted = self.with_store(|store| store.clear()).await?;
        info!("Cleared {} leads", deleted);
        Ok(deleted)
    }

    fn validate_input<'a>(&self, summary: &'a str) -> Result<&'a str, PipelineError> {
        let trimmed = summary.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::InvalidInput(
                "Summary cannot be empty".to_string(),
            ));
        }

        let length = trimmed.chars().count();
        if length > self.config.max_summary_length {
            return Err(PipelineError::InvalidInput(format!(
                "Summary too long: {} chars (max: {})",
                length, self.config.max_summary_length
            )));
        }

        Ok(trimmed)
    }

    /// Run the PII detector; any failure degrades to no spans
    async fn detect_pii(&self, summary: &str) -> Vec<PiiSpan> {
        let detector = Arc::clone(&self.detector);
        let text = summary.to_string();

        let outcome =
            tokio::task::spawn_blocking(move || detector.detect(&text).map_err(|e| e.to_string()))
                .await;

        match outcome {
            Ok(Ok(spans)) => spans,
            Ok(Err(e)) => {
                warn!("PII detection failed, continuing without PII: {}", e);
                Vec::new()
            }
            Err(e) => {
                warn!("PII detection task failed, continuing without PII: {}", e);
                Vec::new()
            }
        }
    }

    /// Single extraction attempt under the configured timeout
    async fn extract(&self, summary: &str) -> Result<RawExtraction, ExtractionError> {
        let prompt = PromptBuilder::new(summary).build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = timeout(
            self.config.extraction_timeout(),
            self.llm_provider.generate(&prompt),
        )
        .await
        .map_err(|_| ExtractionError::Timeout {
            secs: self.config.extraction_timeout_secs,
        })?
        .map_err(|e| ExtractionError::Upstream {
            detail: e.to_string(),
        })?;

        debug!("LLM response length: {} chars", response.len());

        interpret(&response)
    }

    async fn handle_extraction_failure(
        &self,
        pii: Vec<PiiSpan>,
        error: ExtractionError,
    ) -> ProcessingResult {
        let processed_at = Utc::now();

        match error.raw() {
            Some(raw) => warn!("Extraction failed: {} (raw response: {:?})", error, raw),
            None => warn!("Extraction failed: {}", error),
        }

        if self.config.failure_policy == FailurePolicy::PersistPartial {
            let partial = CanonicalLead::pii_only(pii.clone(), processed_at);
            match self.persist(partial).await {
                Ok(id) => info!("Persisted PII-only lead {}", id),
                Err(e) => warn!("Failed to persist PII-only lead: {}", e),
            }
        }

        ProcessingResult::failed(pii, processed_at, error.to_string())
    }

    async fn persist(&self, lead: CanonicalLead) -> Result<LeadId, PipelineError> {
        self.with_store(move |store| store.insert(&lead)).await
    }

    /// Run a store operation on the blocking pool
    async fn with_store<T, F>(&self, op: F) -> Result<T, PipelineError>
    where
        F: FnOnce(&S) -> Result<T, S::Error> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || op(store.as_ref()).map_err(|e| e.to_string()))
            .await
            .map_err(|e| PipelineError::Store(format!("Store task failed: {}", e)))?
            .map_err(PipelineError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_llm::MockProvider;
    use leadline_pii::PatternDetector;
    use leadline_store::SqliteStore;

    fn create_test_pipeline(response: &str) -> Pipeline<PatternDetector, MockProvider, SqliteStore> {
        Pipeline::new(
            PatternDetector::default_config(),
            MockProvider::new(response),
            SqliteStore::in_memory().unwrap(),
            PipelineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_blank_summary_rejected() {
        let pipeline = create_test_pipeline("{}");

        for summary in ["", "   ", "\n\t"] {
            let result = pipeline.process(summary).await;
            assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
        }
        assert_eq!(pipeline.llm_provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_too_long() {
        let pipeline = create_test_pipeline("{}");

        let long_text = "a".repeat(20_001);
        let result = pipeline.process(&long_text).await;
        assert!(matches!(result, Err(PipelineError::InvalidInput(_))));
        assert_eq!(pipeline.llm_provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_summary_is_trimmed_before_prompting() {
        let pipeline = create_test_pipeline("{}");

        pipeline.process("  Met with Jane.  \n").await.unwrap();
        let prompts = pipeline.llm_provider.prompts();
        assert!(prompts[0].contains("Meeting Summary:\nMet with Jane.\n"));
    }

    #[tokio::test]
    async fn test_model_name() {
        assert_eq!(create_test_pipeline("{}").model_name(), "mock");
    }
}
