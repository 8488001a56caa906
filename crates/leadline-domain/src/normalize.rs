//! Schema normalization
//!
//! Projects an arbitrary JSON value onto the canonical
//! `{pii, contact, company, deal}` shape. Normalization is total: any input
//! produces a record with exactly the canonical keys. Unknown keys are
//! dropped.

use serde_json::{Map, Value};

use crate::{Company, Contact, Deal, NormalizedLead, PiiSpan};

/// Normalize a raw mapping into the canonical shape
///
/// - `contact`, `company`, `deal` that are missing, null, or not objects are
///   treated as `{}`; every field missing from them becomes `None`.
/// - `pii` passes through; entries that are not valid spans are skipped.
///
/// # Examples
///
/// ```
/// use leadline_domain::normalize::normalize;
/// use serde_json::json;
///
/// let lead = normalize(&json!({"contact": {"name": "Jane", "nickname": "JD"}}));
/// assert_eq!(lead.contact.name.as_deref(), Some("Jane"));
/// assert!(lead.deal.value.is_none());
/// ```
pub fn normalize(raw: &Value) -> NormalizedLead {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);

    let section = |key: &str| root.get(key).and_then(Value::as_object).unwrap_or(&empty);

    let contact = section("contact");
    let company = section("company");
    let deal = section("deal");

    NormalizedLead {
        pii: pii_list(root.get("pii")),
        contact: Contact {
            name: leaf(contact, "name"),
            title: leaf(contact, "title"),
            email: leaf(contact, "email"),
            phone: leaf(contact, "phone"),
        },
        company: Company {
            name: leaf(company, "name"),
            industry: leaf(company, "industry"),
            size: leaf(company, "size"),
            budget: leaf(company, "budget"),
        },
        deal: Deal {
            value: leaf(deal, "value"),
            stage: leaf(deal, "stage"),
            timeline: leaf(deal, "timeline"),
            competitor: leaf(deal, "competitor"),
            next_action: leaf(deal, "next_action"),
        },
    }
}

/// Read one canonical field
///
/// Strings pass through. Numbers and booleans keep their JSON text since the
/// model regularly answers `"value": 50000`. Anything else is null.
fn leaf(section: &Map<String, Value>, key: &str) -> Option<String> {
    match section.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn pii_list(value: Option<&Value>) -> Vec<PiiSpan> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COMPANY_KEYS, CONTACT_KEYS, DEAL_KEYS};
    use proptest::prelude::*;
    use serde_json::json;

    /// Every section of the serialized record has exactly its canonical keys
    fn assert_canonical_keys(lead: &NormalizedLead) {
        let value = serde_json::to_value(lead).unwrap();
        let root = value.as_object().unwrap();
        let mut root_keys: Vec<_> = root.keys().map(String::as_str).collect();
        root_keys.sort_unstable();
        assert_eq!(root_keys, vec!["company", "contact", "deal", "pii"]);

        for (section, keys) in [
            ("contact", &CONTACT_KEYS[..]),
            ("company", &COMPANY_KEYS[..]),
            ("deal", &DEAL_KEYS[..]),
        ] {
            let obj = root[section].as_object().unwrap();
            assert_eq!(obj.len(), keys.len(), "{} key count", section);
            for key in keys {
                assert!(obj.contains_key(*key), "{}.{} missing", section, key);
            }
        }
    }

    #[test]
    fn test_empty_mapping() {
        let lead = normalize(&json!({}));
        assert_eq!(lead, NormalizedLead::default());
        assert_canonical_keys(&lead);
    }

    #[test]
    fn test_null_sub_objects() {
        let lead = normalize(&json!({"contact": null, "company": null, "deal": null}));
        assert_eq!(lead, NormalizedLead::default());
    }

    #[test]
    fn test_extra_keys_are_dropped() {
        let lead = normalize(&json!({
            "contact": {"name": "Jane Doe", "linkedin": "jdoe", "emial": "typo@x.com"},
            "company": {"name": "Acme", "ticker": "ACME"},
            "notes": "ignored",
        }));
        assert_eq!(lead.contact.name.as_deref(), Some("Jane Doe"));
        assert!(lead.contact.email.is_none());
        assert_eq!(lead.company.name.as_deref(), Some("Acme"));
        assert_canonical_keys(&lead);
    }

    #[test]
    fn test_non_object_input() {
        assert_eq!(normalize(&json!("text")), NormalizedLead::default());
        assert_eq!(normalize(&json!([1, 2])), NormalizedLead::default());
        assert_eq!(normalize(&Value::Null), NormalizedLead::default());
    }

    #[test]
    fn test_non_object_section_is_empty() {
        let lead = normalize(&json!({"contact": "Jane Doe", "deal": ["a"]}));
        assert_eq!(lead.contact, Contact::default());
        assert_eq!(lead.deal, Deal::default());
    }

    #[test]
    fn test_scalar_leaves_are_stringified() {
        let lead = normalize(&json!({
            "deal": {"value": 50000, "stage": true, "timeline": {"q": 3}, "competitor": ["X"]}
        }));
        assert_eq!(lead.deal.value.as_deref(), Some("50000"));
        assert_eq!(lead.deal.stage.as_deref(), Some("true"));
        assert!(lead.deal.timeline.is_none());
        assert!(lead.deal.competitor.is_none());
    }

    #[test]
    fn test_pii_passes_through() {
        let lead = normalize(&json!({
            "pii": [
                {"entity_type": "EMAIL_ADDRESS", "start": 10, "end": 20, "score": 1.0},
                {"bogus": true},
                {"entity": "PERSON", "start": 0, "end": 4, "score": 0.85}
            ]
        }));
        assert_eq!(lead.pii.len(), 2);
        assert_eq!(lead.pii[0].entity_type, "EMAIL_ADDRESS");
        assert_eq!(lead.pii[1].entity_type, "PERSON");
    }

    #[test]
    fn test_missing_pii_defaults_to_empty() {
        let lead = normalize(&json!({"pii": "not a list"}));
        assert!(lead.pii.is_empty());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z_]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 6, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::hash_map(
                    prop_oneof![
                        Just("contact".to_string()),
                        Just("company".to_string()),
                        Just("deal".to_string()),
                        Just("pii".to_string()),
                        Just("name".to_string()),
                        Just("value".to_string()),
                        "[a-z_]{1,8}",
                    ],
                    inner,
                    0..6,
                )
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_normalize_is_total(raw in arb_json()) {
            let lead = normalize(&raw);
            assert_canonical_keys(&lead);
        }

        #[test]
        fn prop_normalize_is_idempotent(raw in arb_json()) {
            let once = normalize(&raw);
            let twice = normalize(&serde_json::to_value(&once).unwrap());
            prop_assert_eq!(once, twice);
        }
    }
}
