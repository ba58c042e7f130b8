//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod json_adapter;
#[cfg(feature = "web")]
pub mod web;

use crate::domain::error::ScreenerError;
use crate::ports::record_source::{RecordSource, SourceFormat};
use std::path::PathBuf;

/// Builds the record source for `path`. Without an explicit format the file
/// extension decides.
pub fn open_record_source(
    path: PathBuf,
    format: Option<SourceFormat>,
) -> Result<Box<dyn RecordSource + Send + Sync>, ScreenerError> {
    let format = format
        .or_else(|| SourceFormat::from_path(&path))
        .ok_or_else(|| ScreenerError::ConfigInvalid {
            section: "data".into(),
            key: "format".into(),
            reason: format!(
                "cannot infer format of {}; set format = json or csv",
                path.display()
            ),
        })?;

    Ok(match format {
        SourceFormat::Json => Box::new(json_adapter::JsonRecordSource::new(path)),
        SourceFormat::Csv => Box::new(csv_adapter::CsvRecordSource::new(path)),
    })
}
