//! Risk-based permission gate

use roundtable_application::{GateVerdict, PermissionGate};
use roundtable_domain::{ToolCall, ToolDefinition};
use std::collections::HashSet;

/// Gate that maps tool risk to a verdict: low-risk tools run immediately,
/// high-risk tools are deferred to the user unless the tool name is on the
/// auto-approve list from config.
pub struct RiskBasedGate {
    auto_approve: HashSet<String>,
}

impl RiskBasedGate {
    pub fn new() -> Self {
        Self {
            auto_approve: HashSet::new(),
        }
    }

    /// Add tool names that skip confirmation regardless of risk.
    pub fn with_auto_approve<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_approve.extend(names.into_iter().map(Into::into));
        self
    }
}

impl Default for RiskBasedGate {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionGate for RiskBasedGate {
    fn assess(&self, call: &ToolCall, definition: &ToolDefinition) -> GateVerdict {
        if self.auto_approve.contains(&call.name) {
            return GateVerdict::Allow;
        }
        if definition.is_high_risk() {
            GateVerdict::AskUser
        } else {
            GateVerdict::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::RiskLevel;

    fn call(name: &str) -> ToolCall {
        ToolCall::new("call_1", name)
    }

    #[test]
    fn test_low_risk_is_allowed() {
        let gate = RiskBasedGate::new();
        let definition = ToolDefinition::new("read_file", "Read a file", RiskLevel::Low);

        assert_eq!(
            gate.assess(&call("read_file"), &definition),
            GateVerdict::Allow
        );
    }

    #[test]
    fn test_high_risk_asks_user() {
        let gate = RiskBasedGate::new();
        let definition = ToolDefinition::new("write_file", "Write a file", RiskLevel::High);

        assert_eq!(
            gate.assess(&call("write_file"), &definition),
            GateVerdict::AskUser
        );
    }

    #[test]
    fn test_auto_approved_high_risk_is_allowed() {
        let gate = RiskBasedGate::new().with_auto_approve(["write_file"]);
        let definition = ToolDefinition::new("write_file", "Write a file", RiskLevel::High);

        assert_eq!(
            gate.assess(&call("write_file"), &definition),
            GateVerdict::Allow
        );
    }
}
