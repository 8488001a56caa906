//! Leadline PII Detector
//!
//! Pattern-based detection of personally identifiable information in
//! meeting summaries. Implements the `PiiDetector` trait from
//! `leadline-domain`.
//!
//! The detector provides:
//! - Recognizers for emails, phone numbers, URLs, IP addresses,
//!   credit card numbers (Luhn-checked) and US social security numbers
//! - Per-recognizer enable list and minimum score
//! - Overlap resolution (higher score wins)
//! - Character offsets, so spans index the text the caller passed in
//!
//! # Examples
//!
//! ```
//! use leadline_pii::{PatternDetector, PiiConfig};
//! use leadline_domain::traits::PiiDetector;
//!
//! let detector = PatternDetector::new(PiiConfig::default());
//! let spans = detector.detect("Reach me at jane@x.com").unwrap();
//! assert_eq!(spans[0].entity_type, "EMAIL_ADDRESS");
//! assert_eq!((spans[0].start, spans[0].end), (12, 22));
//! ```

#![warn(missing_docs)]

mod config;
mod detector;
mod entity;
mod error;

pub use config::PiiConfig;
pub use detector::PatternDetector;
pub use entity::EntityKind;
pub use error::PiiError;
