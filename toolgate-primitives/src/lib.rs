//! Core shared types for toolgate.

#![warn(missing_docs, clippy::pedantic)]

pub mod catalog;
mod error;
mod ids;
mod toolset_id;

/// Static metadata describing the toolsets a server knows about.
pub use catalog::{KnownToolsets, ToolsetMetadata};
/// Error type and result alias shared across the workspace.
pub use error::{Error, Result};
/// Correlation identifier attached to each dispatched call.
pub use ids::CallId;
/// Validated toolset identifier.
pub use toolset_id::ToolsetId;
