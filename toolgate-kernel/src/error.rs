//! Errors raised while building or operating a server.

use thiserror::Error;
use toolgate_tools::ToolError;

use crate::scheduler::SchedulerError;

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while building or operating a server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A toolset could not be registered or enabled during startup.
    #[error("toolset registration failed: {0}")]
    Registration(#[from] ToolError),

    /// A built-in toolset identifier failed validation.
    #[error(transparent)]
    InvalidToolsetId(#[from] toolgate_primitives::Error),

    /// The call scheduler no longer accepts work.
    #[error("call could not be scheduled: {0}")]
    Scheduler(#[from] SchedulerError),
}
