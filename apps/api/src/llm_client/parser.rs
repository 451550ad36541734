//! Structured-output parser for model text.
//!
//! Models asked for "JSON only" still wrap answers in prose or code fences, so
//! parsing is two-pass: the whole text first, then the span from the first `{`
//! to the last `}`.

use serde::Serialize;
use serde_json::{Map, Value};

/// Why model text could not be read as structured output. Carries the raw text
/// so a failed row can be diagnosed later.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseFailure {
    pub error: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    Valid(Value),
    Invalid(ParseFailure),
}

impl ParsedResponse {
    pub fn is_valid(&self) -> bool {
        matches!(self, ParsedResponse::Valid(_))
    }
}

/// A usable star prediction extracted from a structured response.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub stars: i64,
    pub explanation: String,
}

/// Parses raw model text into a JSON value, tolerating surrounding prose.
pub fn parse_structured(raw: &str) -> ParsedResponse {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return ParsedResponse::Valid(value);
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => {
            match serde_json::from_str::<Value>(&raw[start..=end]) {
                Ok(value) => ParsedResponse::Valid(value),
                Err(e) => ParsedResponse::Invalid(ParseFailure {
                    error: e.to_string(),
                    raw: raw.to_string(),
                }),
            }
        }
        _ => ParsedResponse::Invalid(ParseFailure {
            error: "no json found".to_string(),
            raw: raw.to_string(),
        }),
    }
}

/// Accepts a parsed value as a prediction only if it is an object carrying a
/// `predicted_stars` field coercible to an integer. Fractional numbers truncate
/// toward zero; booleans count as 1 and 0; strings must hold an integer.
pub fn extract_prediction(value: &Value) -> Option<Prediction> {
    let object = value.as_object()?;
    let stars = coerce_stars(object.get("predicted_stars")?)?;
    Some(Prediction {
        stars,
        explanation: explanation_of(object),
    })
}

fn coerce_stars(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn explanation_of(object: &Map<String, Value>) -> String {
    match object.get("explanation") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
