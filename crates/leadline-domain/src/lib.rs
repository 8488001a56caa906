//! Leadline Domain Layer
//!
//! This crate contains the core domain model for Leadline: the canonical
//! CRM lead, the normalizer that forces untrusted extraction output into
//! that shape, the completeness-based confidence score, and the trait
//! interfaces for every external collaborator.
//!
//! ## Key Concepts
//!
//! - **CanonicalLead**: fixed `{pii, contact, company, deal}` record with a
//!   confidence score and processing timestamp
//! - **PII span**: labeled offsets of personally identifiable information
//! - **Normalization**: total projection of any JSON onto the canonical keys
//! - **Confidence**: filled fields over 13, floored at 0.1
//!
//! ## Architecture
//!
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod confidence;
pub mod lead;
pub mod normalize;
pub mod traits;

// Re-exports for convenience
pub use lead::{
    CanonicalLead, Company, Contact, Deal, LeadId, LeadStats, NormalizedLead, PiiSpan,
    StoredLead, COMPANY_KEYS, CONTACT_KEYS, DEAL_KEYS,
};
pub use normalize::normalize;
