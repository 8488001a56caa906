//! Pattern-based PII recognition

use leadline_domain::traits::PiiDetector;
use leadline_domain::PiiSpan;
use regex::Regex;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::{EntityKind, PiiConfig, PiiError};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}";
const PHONE_PATTERN: &str = r"(?:\+?1[\s.-]?)?(?:\([0-9]{3}\)|[0-9]{3})[\s.-]?[0-9]{3}[\s.-]?[0-9]{4}\b";
const URL_PATTERN: &str = r#"\b(?:https?://|www\.)[^\s<>"')\]]+"#;
const IP_PATTERN: &str = r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b";
const CARD_PATTERN: &str = r"\b(?:[0-9][ -]?){12,18}[0-9]\b";
const SSN_PATTERN: &str = r"\b[0-9]{3}-[0-9]{2}-[0-9]{4}\b";

/// A compiled recognizer
struct Recognizer {
    kind: EntityKind,
    pattern: Regex,
}

/// A match before overlap resolution, in byte offsets
#[derive(Debug, Clone, Copy)]
struct Candidate {
    kind: EntityKind,
    start: usize,
    end: usize,
}

impl Candidate {
    fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Regex-driven PII detector
pub struct PatternDetector {
    config: PiiConfig,
    recognizers: Vec<Recognizer>,
}

impl PatternDetector {
    /// Create a detector running the configured recognizers
    ///
    /// # Errors
    ///
    /// Returns `PiiError::Config` if the configuration is invalid.
    pub fn try_new(config: PiiConfig) -> Result<Self, PiiError> {
        config.validate()?;

        let mut recognizers = Vec::new();
        for kind in EntityKind::ALL {
            if !config.entities.contains(&kind) {
                continue;
            }
            let pattern = Regex::new(pattern_for(kind))
                .map_err(|e| PiiError::Config(format!("{} pattern: {}", kind.as_str(), e)))?;
            recognizers.push(Recognizer { kind, pattern });
        }

        Ok(Self {
            config,
            recognizers,
        })
    }

    /// Create a detector, falling back to the default configuration if the
    /// given one is invalid
    pub fn new(config: PiiConfig) -> Self {
        match Self::try_new(config) {
            Ok(detector) => detector,
            Err(e) => {
                tracing::warn!("Invalid PII configuration ({}), using defaults", e);
                Self::default_config()
            }
        }
    }

    /// Create a detector with all recognizers enabled
    pub fn default_config() -> Self {
        let config = PiiConfig::default();
        let recognizers = EntityKind::ALL
            .into_iter()
            .filter_map(|kind| {
                Regex::new(pattern_for(kind))
                    .ok()
                    .map(|pattern| Recognizer { kind, pattern })
            })
            .collect();
        Self {
            config,
            recognizers,
        }
    }

    /// The active configuration
    pub fn config(&self) -> &PiiConfig {
        &self.config
    }

    /// Collect raw matches from every recognizer
    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut found = Vec::new();
        for recognizer in &self.recognizers {
            if recognizer.kind.score() < self.config.min_score {
                continue;
            }
            for m in recognizer.pattern.find_iter(text) {
                let mut candidate = Candidate {
                    kind: recognizer.kind,
                    start: m.start(),
                    end: m.end(),
                };
                if accept(&mut candidate, text) {
                    found.push(candidate);
                }
            }
        }
        found
    }
}

/// Pick the winners among overlapping matches
///
/// Higher score wins, then the longer match, then the earlier one.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.kind
            .score()
            .total_cmp(&a.kind.score())
            .then((b.end - b.start).cmp(&(a.end - a.start)))
            .then(a.start.cmp(&b.start))
    });

    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| !k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }
    kept.sort_by_key(|c| c.start);
    kept
}

impl PiiDetector for PatternDetector {
    type Error = PiiError;

    fn detect(&self, text: &str) -> Result<Vec<PiiSpan>, Self::Error> {
        let char_count = text.chars().count();
        if char_count > self.config.max_input_chars {
            return Err(PiiError::InputTooLong(char_count, self.config.max_input_chars));
        }

        let spans: Vec<PiiSpan> = resolve_overlaps(self.candidates(text))
            .into_iter()
            .map(|c| {
                PiiSpan::new(
                    c.kind.as_str(),
                    char_offset(text, c.start),
                    char_offset(text, c.end),
                    c.kind.score(),
                )
            })
            .collect();

        debug!("Detected {} PII spans", spans.len());
        Ok(spans)
    }
}

fn pattern_for(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::EmailAddress => EMAIL_PATTERN,
        EntityKind::PhoneNumber => PHONE_PATTERN,
        EntityKind::Url => URL_PATTERN,
        EntityKind::IpAddress => IP_PATTERN,
        EntityKind::CreditCard => CARD_PATTERN,
        EntityKind::UsSsn => SSN_PATTERN,
    }
}

/// Post-match validation; may shrink the candidate
fn accept(candidate: &mut Candidate, text: &str) -> bool {
    let matched = &text[candidate.start..candidate.end];
    match candidate.kind {
        EntityKind::EmailAddress => true,
        EntityKind::PhoneNumber => {
            // No leading word boundary is possible before "(", so check by hand
            let preceded_by_word = text[..candidate.start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
            !preceded_by_word
        }
        EntityKind::Url => {
            let trimmed = matched.trim_end_matches(['.', ',', ';', ':', '!', '?']);
            candidate.end = candidate.start + trimmed.len();
            trimmed.len() > "www.".len()
        }
        EntityKind::IpAddress => matched.parse::<Ipv4Addr>().is_ok(),
        EntityKind::CreditCard => {
            let digits: Vec<u32> = matched.chars().filter_map(|c| c.to_digit(10)).collect();
            (13..=19).contains(&digits.len()) && luhn_valid(&digits)
        }
        EntityKind::UsSsn => {
            let area = &matched[0..3];
            let group = &matched[4..6];
            let serial = &matched[7..11];
            area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
        }
    }
}

fn luhn_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn char_offset(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count()
}
