//! Record field values and coercion.
//!
//! Values are a closed set of tags. Coercion works by matching the tag:
//! - numbers coerce to themselves, booleans to 1/0, text by parsing a decimal float
//! - every value has a canonical text form used for case-insensitive equality

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Numeric form of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Null => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Truthiness used by bare-field conditions.
    ///
    /// Booleans and text only count as true when their text reads `true`
    /// (case-insensitive), so the text `"false"` is falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Boolean(b) => *b,
            FieldValue::Text(s) => s.eq_ignore_ascii_case("true"),
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Case-insensitive equality between the value's text form and `literal`.
    pub fn text_eq_ignore_case(&self, literal: &str) -> bool {
        self.to_string().to_lowercase() == literal.to_lowercase()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                FieldValue::Text(nested.to_string())
            }
        }
    }
}

/// Parses a literal operand or text cell as a decimal float.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
