//! Response envelope returned for every dispatched call.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolgate_tools::{ErrorCategory, ToolError, ToolResult};

/// Outcome of a call as handed back to the client.
///
/// Failures are reported inside the envelope rather than as transport
/// errors, so the client can read the message and correct its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResponse {
    /// Handler output, or the error message as a JSON string.
    pub content: Value,
    /// `true` when the call failed.
    pub is_error: bool,
    /// Failure classification; `None` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorCategory>,
}

impl CallResponse {
    /// Successful response carrying `content`.
    #[must_use]
    pub fn success(content: Value) -> Self {
        Self {
            content,
            is_error: false,
            error_kind: None,
        }
    }

    /// Failed response describing `error`.
    #[must_use]
    pub fn failure(error: &ToolError) -> Self {
        Self {
            content: Value::String(error.to_string()),
            is_error: true,
            error_kind: Some(error.category()),
        }
    }

    /// Text of a failure, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        if self.is_error {
            self.content.as_str()
        } else {
            None
        }
    }
}

impl From<ToolResult<Value>> for CallResponse {
    fn from(result: ToolResult<Value>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(error) => Self::failure(&error),
        }
    }
}
