//! Tool executor port
//!
//! Defines the interface for executing tools requested by models.

use async_trait::async_trait;
use roundtable_domain::{ToolCall, ToolDefinition, ToolResult};

/// Port for tool execution
///
/// Execution is infallible at the port level: failures are reported as
/// [`ToolResult`] values with `is_error` set, so the requesting model sees
/// what went wrong and can correct itself.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Definitions of all available tools, in registration order.
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Get the definition of a specific tool.
    fn definition(&self, name: &str) -> Option<ToolDefinition> {
        self.definitions().into_iter().find(|d| d.name == name)
    }

    /// Check if a tool is available.
    fn has_tool(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    /// Execute a tool call.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
