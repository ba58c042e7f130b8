//! Domain error types.
//!
//! Condition parsing and evaluation never produce errors; they degrade to a
//! non-match. Only lookups, loading and configuration can fail.

#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    #[error("failed to load records from {source_name}: {reason}")]
    DataLoad { source_name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("stock not found: {symbol}")]
    NotFound { symbol: String },

    #[error("no stocks found in industry: {industry}")]
    IndustryNotFound { industry: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScreenerError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ScreenerError::NotFound { .. } | ScreenerError::IndustryNotFound { .. }
        )
    }
}

impl From<&ScreenerError> for std::process::ExitCode {
    fn from(err: &ScreenerError) -> Self {
        let code: u8 = match err {
            ScreenerError::Io(_) => 1,
            ScreenerError::ConfigParse { .. }
            | ScreenerError::ConfigMissing { .. }
            | ScreenerError::ConfigInvalid { .. } => 2,
            ScreenerError::DataLoad { .. } => 3,
            ScreenerError::NotFound { .. } | ScreenerError::IndustryNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
