//! Interpret LLM output as a raw extraction mapping

use crate::error::ExtractionError;
use serde_json::{Map, Value};

/// Sections every interpreted mapping carries
const SECTIONS: [&str; 3] = ["contact", "company", "deal"];

/// A JSON object returned by the extraction collaborator
///
/// Guaranteed to have `contact`, `company` and `deal` keys; their contents
/// are untrusted until normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction(Map<String, Value>);

impl RawExtraction {
    /// Borrow the underlying mapping
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume into a JSON value for normalization
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Interpret an LLM response as a raw extraction
///
/// Strips a surrounding markdown code fence if present. Missing or null
/// sections default to `{}`. Field contents are not validated.
///
/// # Errors
///
/// Returns `ExtractionError::MalformedJson`, carrying the response
/// verbatim, if the text is not a JSON object.
pub fn interpret(response: &str) -> Result<RawExtraction, ExtractionError> {
    let json_str = extract_json(response);

    let json: Value = serde_json::from_str(json_str).map_err(|e| ExtractionError::MalformedJson {
        detail: e.to_string(),
        raw: response.to_string(),
    })?;

    let Value::Object(mut map) = json else {
        return Err(ExtractionError::MalformedJson {
            detail: "expected a JSON object".to_string(),
            raw: response.to_string(),
        });
    };

    for key in SECTIONS {
        let entry = map.entry(key).or_insert(Value::Null);
        if entry.is_null() {
            *entry = Value::Object(Map::new());
        }
    }

    Ok(RawExtraction(map))
}

/// Extract JSON from response, handling markdown code blocks
///
/// Best effort: one leading "```" with any language tag, and one
/// trailing "```".
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        None => trimmed,
    };
    let body = body.strip_suffix("```").unwrap_or(body);

    body.trim()
}
