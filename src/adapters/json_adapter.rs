//! Flat JSON mapping record source.
//!
//! Expected shape: `{"AAPL": {"CAGR": 18.2, "Stock Industry": "Tech"}, ...}`.
//!
//! Writers that dump missing floats emit the bare tokens `NaN`, `Infinity`
//! and `-Infinity`. They are read as null.

use crate::domain::error::ScreenerError;
use crate::domain::record::{Record, RecordSet};
use crate::domain::value::FieldValue;
use crate::ports::record_source::RecordSource;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

/// Longest first so `-Infinity` is not split.
const NON_FINITE_TOKENS: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_error(&self, reason: impl Into<String>) -> ScreenerError {
        ScreenerError::DataLoad {
            source_name: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(&self, content: &str) -> Result<RecordSet, ScreenerError> {
        let content = null_non_finite(content);
        let root: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| self.load_error(format!("JSON parse error: {}", e)))?;

        let serde_json::Value::Object(entries) = root else {
            return Err(self.load_error("top-level value must be an object keyed by symbol"));
        };

        let mut records = RecordSet::new();
        for (symbol, value) in entries {
            let serde_json::Value::Object(fields) = value else {
                return Err(self.load_error(format!("record for {} is not an object", symbol)));
            };
            let record: Record = fields
                .into_iter()
                .map(|(field, value)| (field, FieldValue::from(value)))
                .collect();
            records.insert(&symbol, record);
        }
        Ok(records)
    }
}

/// Replaces non-finite number tokens outside string literals with `null`.
fn null_non_finite(content: &str) -> Cow<'_, str> {
    if !NON_FINITE_TOKENS.iter().any(|token| content.contains(token)) {
        return Cow::Borrowed(content);
    }

    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    let mut in_string = false;
    let mut escaped = false;
    let mut replaced = 0usize;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
        } else if ch == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE_TOKENS.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            replaced += 1;
            continue;
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    if replaced > 0 {
        tracing::debug!(replaced, "non-finite numbers read as null");
    }
    Cow::Owned(out)
}

impl RecordSource for JsonRecordSource {
    fn load(&self) -> Result<RecordSet, ScreenerError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.load_error(format!("failed to read file: {}", e)))?;
        self.parse(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
