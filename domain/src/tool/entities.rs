//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only operations (e.g., read_file, list_dir)
    Low,
    /// Operations that modify state (e.g., write_file, run_command)
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tool invocation requested by a model.
///
/// The `id` is unique within a turn and correlates the call with its
/// [`ToolResult`](crate::tool::value_objects::ToolResult).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }

    pub fn with_arguments(mut self, arguments: HashMap<String, serde_json::Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Get a string argument by name.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument by name.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.arguments.get(key).and_then(|v| v.as_i64())
    }

    /// Get a boolean argument by name.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.arguments.get(key).and_then(|v| v.as_bool())
    }

    /// Get a required string argument, with a descriptive error for the
    /// model to correct itself.
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("tool '{}' requires string argument '{}'", self.name, key))
    }

    /// Compact single-line rendering for logs and permission prompts.
    pub fn summary(&self) -> String {
        let mut args: Vec<String> = self
            .arguments
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        args.sort();
        format!("{}({})", self.name, args.join(", "))
    }
}

/// Definition of a tool that models may invoke
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "read_file")
    pub name: String,
    /// Human-readable description, shown to models
    pub description: String,
    /// Risk level of this tool
    pub risk_level: RiskLevel,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Type hint (e.g., "string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.requires_confirmation()
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_call_argument_access() {
        let call = ToolCall::new("call_1", "read_file")
            .with_arg("path", serde_json::json!("/tmp/notes.txt"))
            .with_arg("limit", serde_json::json!(40));

        assert_eq!(call.get_string("path"), Some("/tmp/notes.txt"));
        assert_eq!(call.get_string("limit"), None);
        assert_eq!(call.get_i64("limit"), Some(40));
        assert_eq!(call.get_bool("limit"), None);
        assert!(call.require_string("path").is_ok());

        let err = call.require_string("pattern").unwrap_err();
        assert!(err.contains("read_file"));
        assert!(err.contains("pattern"));
    }

    #[test]
    fn test_tool_call_summary_is_stable() {
        let call = ToolCall::new("call_1", "grep")
            .with_arg("pattern", serde_json::json!("fixme"))
            .with_arg("path", serde_json::json!("src"));

        assert_eq!(call.summary(), r#"grep(path="src", pattern="fixme")"#);
    }

    #[test]
    fn test_risk_level_confirmation() {
        assert!(!RiskLevel::Low.requires_confirmation());
        assert!(RiskLevel::High.requires_confirmation());

        let tool = ToolDefinition::new("write_file", "Write a file", RiskLevel::High);
        assert!(tool.is_high_risk());
    }

    #[test]
    fn test_tool_definition_builder() {
        let tool = ToolDefinition::new("read_file", "Read a file", RiskLevel::Low)
            .with_parameter(ToolParameter::new("path", "File path", true).with_type("path"));

        assert_eq!(tool.parameters.len(), 1);
        assert_eq!(tool.parameters[0].param_type, "path");
        assert!(tool.parameters[0].required);
    }
}
