//! Lead module - the canonical CRM record produced from a meeting summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::confidence;

/// Canonical contact keys, in schema order
pub const CONTACT_KEYS: [&str; 4] = ["name", "title", "email", "phone"];

/// Canonical company keys, in schema order
pub const COMPANY_KEYS: [&str; 4] = ["name", "industry", "size", "budget"];

/// Canonical deal keys, in schema order
pub const DEAL_KEYS: [&str; 5] = ["value", "stage", "timeline", "competitor", "next_action"];

/// Unique identifier for a stored lead based on UUIDv7
///
/// Assigned by the store on insert. It is not part of the canonical shape
/// returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeadId(u128);

impl LeadId {
    /// Generate a new UUIDv7-based LeadId
    ///
    /// # Examples
    ///
    /// ```
    /// use leadline_domain::LeadId;
    ///
    /// let id = LeadId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a LeadId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a LeadId from its hyphenated string form
    ///
    /// # Examples
    ///
    /// ```
    /// use leadline_domain::LeadId;
    ///
    /// let id = LeadId::new();
    /// let parsed = LeadId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid lead id: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for LeadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A labeled span of personally identifiable information in the input text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiSpan {
    /// Recognizer label, e.g. `EMAIL_ADDRESS`
    #[serde(alias = "entity")]
    pub entity_type: String,

    /// Start offset (chars, inclusive)
    pub start: usize,

    /// End offset (chars, exclusive)
    pub end: usize,

    /// Detection score in [0, 1]
    pub score: f64,
}

impl PiiSpan {
    /// Create a new span
    pub fn new(entity_type: impl Into<String>, start: usize, end: usize, score: f64) -> Self {
        Self {
            entity_type: entity_type.into(),
            start,
            end,
            score,
        }
    }
}

/// Contact person mentioned in the meeting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Full name
    pub name: Option<String>,
    /// Job title
    pub title: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone number
    pub phone: Option<String>,
}

impl Contact {
    /// Field values in `CONTACT_KEYS` order
    pub fn values(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.title.as_deref(),
            self.email.as_deref(),
            self.phone.as_deref(),
        ]
    }
}

/// Prospect company
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company name
    pub name: Option<String>,
    /// Industry or vertical
    pub industry: Option<String>,
    /// Headcount or size band
    pub size: Option<String>,
    /// Stated budget
    pub budget: Option<String>,
}

impl Company {
    /// Field values in `COMPANY_KEYS` order
    pub fn values(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.industry.as_deref(),
            self.size.as_deref(),
            self.budget.as_deref(),
        ]
    }
}

/// Sales opportunity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Deal value as extracted (free text)
    pub value: Option<String>,
    /// Pipeline stage
    pub stage: Option<String>,
    /// Decision timeline
    pub timeline: Option<String>,
    /// Competing vendor
    pub competitor: Option<String>,
    /// Agreed next step
    pub next_action: Option<String>,
}

impl Deal {
    /// Field values in `DEAL_KEYS` order
    pub fn values(&self) -> [Option<&str>; 5] {
        [
            self.value.as_deref(),
            self.stage.as_deref(),
            self.timeline.as_deref(),
            self.competitor.as_deref(),
            self.next_action.as_deref(),
        ]
    }
}

/// Output of the schema normalizer: the canonical shape without bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLead {
    /// PII spans, passed through unchanged
    pub pii: Vec<PiiSpan>,
    /// Canonical contact
    pub contact: Contact,
    /// Canonical company
    pub company: Company,
    /// Canonical deal
    pub deal: Deal,
}

/// The unit of storage
///
/// Constructed once per processed summary and never mutated after it is
/// persisted. `confidence` is derived from the contact/company/deal fields
/// at construction time and is not recomputed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLead {
    /// PII spans detected in the source text
    pub pii: Vec<PiiSpan>,
    /// Canonical contact
    pub contact: Contact,
    /// Canonical company
    pub company: Company,
    /// Canonical deal
    pub deal: Deal,
    /// Completeness score in [0.1, 1.0]
    pub confidence: f64,
    /// When the summary was processed
    pub processed_at: DateTime<Utc>,
}

impl CanonicalLead {
    /// Build a lead from normalized fields, scoring it once
    pub fn new(normalized: NormalizedLead, processed_at: DateTime<Utc>) -> Self {
        let confidence = confidence::score(&normalized.contact, &normalized.company, &normalized.deal);
        Self {
            pii: normalized.pii,
            contact: normalized.contact,
            company: normalized.company,
            deal: normalized.deal,
            confidence,
            processed_at,
        }
    }

    /// A lead carrying only PII, with every canonical field null
    pub fn pii_only(pii: Vec<PiiSpan>, processed_at: DateTime<Utc>) -> Self {
        Self::new(
            NormalizedLead {
                pii,
                ..NormalizedLead::default()
            },
            processed_at,
        )
    }
}

/// A lead as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLead {
    /// Storage-assigned identifier
    pub id: LeadId,
    /// Insert timestamp (equal to `processed_at`)
    pub created_at: DateTime<Utc>,
    /// The persisted record
    pub lead: CanonicalLead,
}

/// Aggregate statistics over all stored leads
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadStats {
    /// Number of stored leads
    pub total_leads: u64,
    /// Leads whose deal value is present and non-empty
    pub total_deals: u64,
    /// Sum of the numeric deal values
    pub total_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_id_display_round_trip() {
        let id = LeadId::new();
        let parsed = LeadId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_lead_ids_are_time_ordered() {
        let first = LeadId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = LeadId::new();
        assert!(second > first);
    }

    #[test]
    fn test_pii_span_accepts_legacy_entity_key() {
        let span: PiiSpan =
            serde_json::from_str(r#"{"entity": "EMAIL_ADDRESS", "start": 1, "end": 5, "score": 1.0}"#)
                .unwrap();
        assert_eq!(span.entity_type, "EMAIL_ADDRESS");
    }

    #[test]
    fn test_contact_serializes_explicit_nulls() {
        let json = serde_json::to_value(Contact::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 4);
        for key in CONTACT_KEYS {
            assert!(obj[key].is_null(), "{} should be null", key);
        }
    }

    #[test]
    fn test_pii_only_lead_has_floor_confidence() {
        let lead = CanonicalLead::pii_only(vec![PiiSpan::new("PHONE_NUMBER", 0, 8, 0.75)], Utc::now());
        assert_eq!(lead.confidence, 0.1);
        assert_eq!(lead.pii.len(), 1);
        assert_eq!(lead.contact, Contact::default());
    }
}
