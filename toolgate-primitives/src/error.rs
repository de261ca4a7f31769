//! Shared error definitions for toolgate primitives.

use thiserror::Error;
use uuid::Error as UuidError;

/// Result alias used throughout the primitives crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while manipulating primitive types.
#[derive(Debug, Error)]
pub enum Error {
    /// The provided call identifier could not be parsed.
    #[error("invalid call id: {source}")]
    InvalidCallId {
        /// Source parsing error from the UUID library.
        #[from]
        source: UuidError,
    },

    /// Toolset identifier failed validation.
    #[error("invalid toolset id `{id}`: {reason}")]
    InvalidToolsetId {
        /// The offending identifier string.
        id: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
