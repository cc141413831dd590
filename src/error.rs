//! Error types for option loading, validation, and tool I/O.
//!
//! Breaking text never fails; a zero line count is how "nothing fits" is
//! reported. Only the configuration surfaces return errors.

use alloc::string::String;

/// Errors raised while loading or validating text box options.
#[derive(Debug, thiserror::Error)]
pub enum TextFlowError {
    /// An option has a value the layout cannot work with.
    #[error("invalid option `{name}`: {value}")]
    InvalidOption {
        /// Option name as it appears in JSON.
        name: &'static str,
        /// Offending value, rendered for display.
        value: String,
    },
    /// Options JSON could not be decoded.
    #[error("options JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Reading input or writing output failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl TextFlowError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            value: value.into(),
        }
    }
}
