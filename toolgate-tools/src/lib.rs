//! Operations, toolsets, and the registry that decides which of them a
//! client may invoke.
//!
//! Toolsets are supplied pre-built by their collaborators; the registry only
//! stores them, tracks their enabled flags, and filters write operations
//! when the server runs in read-only mode.

#![warn(missing_docs, clippy::pedantic)]

mod error;
pub mod operation;
pub mod registry;
pub mod toolset;

pub use error::{ErrorCategory, ToolError, ToolResult};
pub use operation::{
    Operation, OperationDescriptor, OperationHandler, OperationKind, OperationMetadata,
};
pub use registry::{Activation, EnableOptions, ToolsetGroup, ToolsetSnapshot, ToolsetSummary};
pub use toolset::{PromptDefinition, ResourceTemplate, Toolset};
