//! Item configuration errors
//!
//! Raised when an item rejects the options it was configured with. The
//! prompt assembler downgrades these to an error item, so they never reach
//! the shell.

use thiserror::Error;

/// Error type for item construction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required option '{0}'")]
    MissingOption(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{option}' expects {expected}, got {got}")]
    WrongType {
        option: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("invalid value for option '{option}': {reason}")]
    InvalidValue { option: String, reason: String },
}

impl ConfigError {
    pub fn missing(option: impl Into<String>) -> Self {
        Self::MissingOption(option.into())
    }

    pub fn unknown(option: impl Into<String>) -> Self {
        Self::UnknownOption(option.into())
    }

    pub fn wrong_type(option: impl Into<String>, expected: &'static str, got: &'static str) -> Self {
        Self::WrongType {
            option: option.into(),
            expected,
            got,
        }
    }

    pub fn invalid(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending option
    pub fn option(&self) -> &str {
        match self {
            Self::MissingOption(o) | Self::UnknownOption(o) => o,
            Self::WrongType { option, .. } | Self::InvalidValue { option, .. } => option,
        }
    }
}
