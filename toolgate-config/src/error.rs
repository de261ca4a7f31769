//! Errors produced while loading configuration.

use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A boolean setting held something other than a recognised flag value.
    #[error("invalid boolean for `{key}`: `{value}` (expected true/false, 1/0, yes/no, on/off)")]
    InvalidBool {
        /// Setting name.
        key: String,
        /// Offending value.
        value: String,
    },
}
