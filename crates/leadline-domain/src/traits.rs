//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and the
//! collaborators the pipeline depends on. Implementations live in other
//! crates.

use async_trait::async_trait;

use crate::{CanonicalLead, LeadId, LeadStats, PiiSpan, StoredLead};

/// Trait for detecting PII spans in text
///
/// Implemented by the PII layer (leadline-pii)
pub trait PiiDetector {
    /// Error type for detection
    type Error;

    /// Detect PII spans in the given text
    fn detect(&self, text: &str) -> Result<Vec<PiiSpan>, Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (leadline-llm)
#[async_trait]
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model behind this provider
    fn model_name(&self) -> &str;
}

/// Trait for persisting leads
///
/// Implemented by the infrastructure layer (leadline-store). Stores are
/// append-only: leads are inserted once and only removed in bulk.
pub trait LeadStore {
    /// Error type for store operations
    type Error;

    /// Insert a lead, returning its storage identifier
    fn insert(&self, lead: &CanonicalLead) -> Result<LeadId, Self::Error>;

    /// List stored leads, most recent first
    fn list(&self, limit: Option<usize>) -> Result<Vec<StoredLead>, Self::Error>;

    /// Aggregate statistics over all stored leads
    fn stats(&self) -> Result<LeadStats, Self::Error>;

    /// Delete every stored lead, returning how many were removed
    fn clear(&self) -> Result<u64, Self::Error>;
}
