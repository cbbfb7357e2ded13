//! Tool result value objects

use serde::{Deserialize, Serialize};

/// Outcome of executing (or refusing to execute) a tool call.
///
/// `call_id` matches the originating
/// [`ToolCall::id`](crate::tool::entities::ToolCall::id). Denials are
/// reported as errors so the model learns the call did not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    pub fn success(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(call_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: message.into(),
            is_error: true,
        }
    }

    /// Error result for a call the permission gate refused.
    pub fn denied(call_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::error(
            call_id,
            format!("permission denied: {}", reason.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result() {
        let result = ToolResult::success("call_1", "file contents here");
        assert!(!result.is_error);
        assert_eq!(result.call_id, "call_1");
    }

    #[test]
    fn test_denied_is_an_error_with_reason() {
        let result = ToolResult::denied("call_2", "user declined");
        assert!(result.is_error);
        assert_eq!(result.content, "permission denied: user declined");
    }
}
