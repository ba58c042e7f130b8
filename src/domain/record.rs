//! Records and record sets.

use crate::domain::value::FieldValue;
use indexmap::IndexMap;
use serde::Serialize;

/// One symbol's metrics. Field order is kept as loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// `None` when the field is absent; `Some(&FieldValue::Null)` when present but null.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Symbol → record, iterated in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: IndexMap<String, Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record. A repeated symbol replaces the earlier record in place.
    pub fn insert(&mut self, symbol: &str, record: Record) {
        self.records.insert(symbol.to_string(), record);
    }

    pub fn with(mut self, symbol: &str, record: Record) -> Self {
        self.insert(symbol, record);
        self
    }

    pub fn get(&self, symbol: &str) -> Option<&Record> {
        self.records.get(symbol)
    }

    pub fn get_match(&self, symbol: &str) -> Option<Match<'_>> {
        self.records
            .get_key_value(symbol)
            .map(|(symbol, record)| Match { symbol, record })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A selected record, serialized as `{"symbol": ..., "data": {...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Match<'a> {
    pub symbol: &'a str,
    #[serde(rename = "data")]
    pub record: &'a Record,
}
