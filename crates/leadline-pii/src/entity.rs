//! Recognized PII entity kinds

use serde::{Deserialize, Serialize};

/// Kind of PII a recognizer reports
///
/// Labels follow the upper-snake naming common to PII tooling so stored
/// spans stay comparable with other detectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Email address
    EmailAddress,
    /// North American style phone number
    PhoneNumber,
    /// http(s) or www URL
    Url,
    /// IPv4 address
    IpAddress,
    /// Payment card number passing the Luhn check
    CreditCard,
    /// US social security number
    UsSsn,
}

impl EntityKind {
    /// Every kind, in detection order
    pub const ALL: [EntityKind; 6] = [
        EntityKind::EmailAddress,
        EntityKind::PhoneNumber,
        EntityKind::Url,
        EntityKind::IpAddress,
        EntityKind::CreditCard,
        EntityKind::UsSsn,
    ];

    /// Label stored on spans
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::EmailAddress => "EMAIL_ADDRESS",
            EntityKind::PhoneNumber => "PHONE_NUMBER",
            EntityKind::Url => "URL",
            EntityKind::IpAddress => "IP_ADDRESS",
            EntityKind::CreditCard => "CREDIT_CARD",
            EntityKind::UsSsn => "US_SSN",
        }
    }

    /// Fixed score reported for a match of this kind
    pub fn score(&self) -> f64 {
        match self {
            EntityKind::EmailAddress => 1.0,
            EntityKind::CreditCard => 1.0,
            EntityKind::UsSsn => 0.85,
            EntityKind::PhoneNumber => 0.75,
            EntityKind::IpAddress => 0.6,
            EntityKind::Url => 0.5,
        }
    }
}
