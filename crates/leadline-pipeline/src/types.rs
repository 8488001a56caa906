//! Result type returned to callers

use chrono::{DateTime, Utc};
use leadline_domain::{CanonicalLead, Company, Contact, Deal, PiiSpan};
use serde::{Deserialize, Serialize};

/// Outcome of processing one summary
///
/// Always fully shaped: on failure the contact/company/deal fields are all
/// null and `confidence` is 0.0, so callers never need to check for
/// missing keys. `success` tells the two apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    /// PII spans detected in the summary
    pub pii: Vec<PiiSpan>,

    /// Canonical contact
    pub contact: Contact,

    /// Canonical company
    pub company: Company,

    /// Canonical deal
    pub deal: Deal,

    /// Completeness score; 0.0 on failure
    pub confidence: f64,

    /// When the summary was processed
    pub processed_at: DateTime<Utc>,

    /// Whether extraction succeeded
    pub success: bool,

    /// Why extraction failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Non-fatal problem, e.g. the lead could not be saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl ProcessingResult {
    /// Wrap a successfully built lead
    pub fn succeeded(lead: CanonicalLead, warning: Option<String>) -> Self {
        Self {
            pii: lead.pii,
            contact: lead.contact,
            company: lead.company,
            deal: lead.deal,
            confidence: lead.confidence,
            processed_at: lead.processed_at,
            success: true,
            error: None,
            warning,
        }
    }

    /// A failed result that still carries the detected PII
    pub fn failed(pii: Vec<PiiSpan>, processed_at: DateTime<Utc>, error: impl Into<String>) -> Self {
        Self {
            pii,
            contact: Contact::default(),
            company: Company::default(),
            deal: Deal::default(),
            confidence: 0.0,
            processed_at,
            success: false,
            error: Some(error.into()),
            warning: None,
        }
    }
}
