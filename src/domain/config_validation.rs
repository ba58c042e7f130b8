//! Configuration validation.
//!
//! Validates all config fields before records are loaded or the server starts.

use crate::domain::error::ScreenerError;
use crate::ports::config_port::ConfigPort;
use crate::ports::record_source::SourceFormat;
use std::net::SocketAddr;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    validate_data_path(config)?;
    validate_data_format(config)?;
    validate_positive(config, "query", "default_limit")?;
    validate_positive(config, "query", "page_size")?;
    validate_listen(config)?;
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    match config.get_string("data", "path") {
        Some(path) if !path.trim().is_empty() => Ok(()),
        _ => Err(ScreenerError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_data_format(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let Some(format) = config.get_string("data", "format") else {
        return Ok(());
    };
    if SourceFormat::parse(&format).is_none() {
        return Err(ScreenerError::ConfigInvalid {
            section: "data".to_string(),
            key: "format".to_string(),
            reason: format!("unknown format '{}' (expected json or csv)", format),
        });
    }
    Ok(())
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), ScreenerError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 => Ok(()),
        _ => Err(ScreenerError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive integer", key),
        }),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), ScreenerError> {
    let Some(listen) = config.get_string("web", "listen") else {
        return Ok(());
    };
    if listen.trim().parse::<SocketAddr>().is_err() {
        return Err(ScreenerError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: format!("'{}' is not a socket address", listen),
        });
    }
    Ok(())
}
