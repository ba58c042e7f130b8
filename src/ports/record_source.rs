//! Record source port trait.

use crate::domain::error::ScreenerError;
use crate::domain::record::RecordSet;

/// Produces a complete, normalized record set.
///
/// Implementations read one persisted shape (flat JSON mapping, CSV table)
/// and hand back a `RecordSet` with missing cells already turned into nulls.
pub trait RecordSource {
    fn load(&self) -> Result<RecordSet, ScreenerError>;

    /// Human-readable origin, used in logs and error messages.
    fn describe(&self) -> String;
}

/// Persisted record-source shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `{symbol: {field: value}}`
    Json,
    /// Header row, symbol in the first column.
    Csv,
}

impl SourceFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(SourceFormat::Json),
            "csv" => Some(SourceFormat::Csv),
            _ => None,
        }
    }

    /// Infers the format from a file extension.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }
}
