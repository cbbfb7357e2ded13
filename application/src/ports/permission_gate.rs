//! Permission gate port
//!
//! Defines how tool calls are cleared before execution. The gate gives an
//! immediate verdict; when the verdict is `AskUser`, the orchestrator
//! raises a [`PermissionRequest`](crate::ports::turn_event::PermissionRequest)
//! event and waits for the reply.

use roundtable_domain::{ToolCall, ToolDefinition};

/// Immediate verdict on a tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    /// Execute without asking.
    Allow,
    /// Refuse without asking.
    Deny { reason: String },
    /// Defer to the human via a permission request event.
    AskUser,
}

/// Port for pre-execution review of tool calls.
///
/// Implementations decide per call: a risk-based gate allows low-risk
/// tools and defers high-risk ones, a locked-down gate denies everything,
/// a trusting gate allows everything.
pub trait PermissionGate: Send + Sync {
    fn assess(&self, call: &ToolCall, definition: &ToolDefinition) -> GateVerdict;
}

/// Gate that allows every call. For tests and trusted setups.
pub struct AllowAllGate;

impl PermissionGate for AllowAllGate {
    fn assess(&self, _call: &ToolCall, _definition: &ToolDefinition) -> GateVerdict {
        GateVerdict::Allow
    }
}

/// Gate that denies every call. For non-interactive runs where nothing
/// should touch the machine.
pub struct DenyAllGate;

impl PermissionGate for DenyAllGate {
    fn assess(&self, _call: &ToolCall, _definition: &ToolDefinition) -> GateVerdict {
        GateVerdict::Deny {
            reason: "tool execution is disabled".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::RiskLevel;

    #[test]
    fn test_builtin_gates() {
        let call = ToolCall::new("call_1", "read_file");
        let definition = ToolDefinition::new("read_file", "Read a file", RiskLevel::Low);

        assert_eq!(AllowAllGate.assess(&call, &definition), GateVerdict::Allow);
        assert!(matches!(
            DenyAllGate.assess(&call, &definition),
            GateVerdict::Deny { .. }
        ));
    }
}
