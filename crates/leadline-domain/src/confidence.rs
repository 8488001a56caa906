//! Completeness-based confidence scoring
//!
//! The score is the fraction of the 13 canonical fields that carry a value,
//! floored at 0.1 and rounded to two decimals. It is a pure function of the
//! contact/company/deal triple.

use crate::{Company, Contact, Deal};

/// Number of canonical leaf fields (4 contact + 4 company + 5 deal)
pub const FIELD_COUNT: usize = 13;

/// Lowest score a lead can carry
pub const CONFIDENCE_FLOOR: f64 = 0.1;

/// Whether a field counts as filled
///
/// The model sometimes emits the text `"null"` instead of a JSON null, so
/// that literal is treated as empty.
pub fn is_filled(value: Option<&str>) -> bool {
    matches!(value, Some(v) if !v.is_empty() && v != "null")
}

/// Number of filled fields across the triple
pub fn filled_count(contact: &Contact, company: &Company, deal: &Deal) -> usize {
    contact
        .values()
        .into_iter()
        .chain(company.values())
        .chain(deal.values())
        .filter(|v| is_filled(*v))
        .count()
}

/// Score a canonical triple
///
/// # Examples
///
/// ```
/// use leadline_domain::{confidence, Company, Contact, Deal};
///
/// let score = confidence::score(&Contact::default(), &Company::default(), &Deal::default());
/// assert_eq!(score, 0.1);
/// ```
pub fn score(contact: &Contact, company: &Company, deal: &Deal) -> f64 {
    let filled = filled_count(contact, company, deal);
    let ratio = (filled as f64 / FIELD_COUNT as f64).max(CONFIDENCE_FLOOR);
    (ratio * 100.0).round() / 100.0
}
