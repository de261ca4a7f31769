//! Errors produced by toolset registration, enablement, and invocation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operation::OperationKind;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Coarse classification of a [`ToolError`], used by callers to decide
/// whether a retry with corrected input makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed input on a call.
    Validation,
    /// Referenced toolset or operation does not exist.
    NotFound,
    /// The target exists but the action is refused by configuration.
    Policy,
    /// The operation exists but its toolset is currently disabled.
    NotEnabled,
    /// Toolset construction was inconsistent.
    Registration,
    /// The handler itself failed.
    Execution,
}

/// Errors produced by toolset registration, enablement, and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Operation metadata failed validation.
    #[error("invalid operation metadata: {reason}")]
    InvalidMetadata {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Operation was added to the collection that does not match its kind.
    #[error("operation `{name}` is classified as {actual:?} and cannot be registered as {expected:?}")]
    Misclassified {
        /// Name of the offending operation.
        name: String,
        /// Kind required by the target collection.
        expected: OperationKind,
        /// Kind declared by the operation.
        actual: OperationKind,
    },

    /// Operation name collided with an existing registration.
    #[error("operation `{name}` is already registered")]
    DuplicateOperation {
        /// Name of the offending operation.
        name: String,
    },

    /// Toolset identifier collided with an existing registration.
    #[error("toolset `{id}` is already registered")]
    DuplicateToolset {
        /// Identifier of the offending toolset.
        id: String,
    },

    /// Call arguments were missing or malformed.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Requested toolset does not exist.
    #[error("toolset `{id}` not found")]
    ToolsetNotFound {
        /// Identifier that matched nothing.
        id: String,
    },

    /// Requested operation does not exist or is hidden.
    #[error("operation `{name}` not found")]
    OperationNotFound {
        /// Name that matched nothing.
        name: String,
    },

    /// Operation exists but its toolset is disabled.
    #[error("operation `{operation}` belongs to toolset `{toolset}`, which is not enabled")]
    ToolsetNotEnabled {
        /// Owning toolset.
        toolset: String,
        /// Requested operation.
        operation: String,
    },

    /// Enabling the toolset would expose nothing because the registry is read-only.
    #[error("toolset `{toolset}` only contains write operations and the server is read-only")]
    ReadOnly {
        /// Toolset that was refused.
        toolset: String,
    },

    /// Toolset cannot be disabled.
    #[error("toolset `{id}` is always enabled")]
    AlwaysEnabled {
        /// Identifier of the pinned toolset.
        id: String,
    },

    /// Operation execution failed.
    #[error("operation execution failed: {reason}")]
    Execution {
        /// Human-readable error returned by the handler.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }

    /// Creates a validation error from the supplied reason.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::Validation,
            Self::ToolsetNotFound { .. } | Self::OperationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            Self::ReadOnly { .. } | Self::AlwaysEnabled { .. } => ErrorCategory::Policy,
            Self::ToolsetNotEnabled { .. } => ErrorCategory::NotEnabled,
            Self::InvalidMetadata { .. }
            | Self::Misclassified { .. }
            | Self::DuplicateOperation { .. }
            | Self::DuplicateToolset { .. } => ErrorCategory::Registration,
            Self::Execution { .. } => ErrorCategory::Execution,
        }
    }

    /// Returns `true` for not-found conditions.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_separate_not_found_from_policy() {
        let missing = ToolError::ToolsetNotFound { id: "nope".into() };
        let refused = ToolError::ReadOnly {
            toolset: "gists".into(),
        };
        assert!(missing.is_not_found());
        assert_eq!(refused.category(), ErrorCategory::Policy);
        assert_eq!(
            ToolError::invalid_input("missing field").category(),
            ErrorCategory::Validation
        );
    }

    #[test]
    fn messages_name_the_subject() {
        let err = ToolError::ToolsetNotEnabled {
            toolset: "gists".into(),
            operation: "list_gists".into(),
        };
        assert_eq!(
            err.to_string(),
            "operation `list_gists` belongs to toolset `gists`, which is not enabled"
        );
    }
}
