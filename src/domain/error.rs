//! Error types for the adapter and CLI layers.
//!
//! The engine itself degrades gracefully instead of erroring: malformed
//! numeric input is coerced during normalization and short input yields
//! neutral results. Errors exist only where data is acquired (files,
//! config) before it reaches the engine.

#[derive(Debug, thiserror::Error)]
pub enum TwquantError {
    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error("no price data for {code}")]
    NoData { code: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TwquantError> for std::process::ExitCode {
    fn from(err: &TwquantError) -> Self {
        let code: u8 = match err {
            TwquantError::Io(_) => 1,
            TwquantError::ConfigParse { .. }
            | TwquantError::ConfigMissing { .. }
            | TwquantError::ConfigInvalid { .. } => 2,
            TwquantError::Data { .. } => 3,
            TwquantError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
