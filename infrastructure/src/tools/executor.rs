//! Local tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! Bridges the application layer's abstract tool port with actual system
//! operations: file I/O and process execution. Every failure is captured
//! into the [`ToolResult`] so the requesting model sees what went wrong.

use async_trait::async_trait;
use roundtable_application::ToolExecutorPort;
use roundtable_domain::{ToolCall, ToolDefinition, ToolResult};
use serde_json::json;

use super::{command, file};

/// Executor that runs tools on the local machine.
#[derive(Debug, Clone)]
pub struct LocalToolExecutor {
    /// Available tools, in registration order
    definitions: Vec<ToolDefinition>,
    /// Working directory for commands (None = current directory)
    working_dir: Option<String>,
}

impl LocalToolExecutor {
    /// Create a new executor with all built-in tools.
    pub fn new() -> Self {
        Self {
            definitions: super::default_tools(),
            working_dir: None,
        }
    }

    /// Create an executor with only read-only (low-risk) tools.
    pub fn read_only() -> Self {
        Self {
            definitions: super::read_only_tools(),
            working_dir: None,
        }
    }

    /// Create an executor with a custom tool set
    pub fn with_tools(definitions: Vec<ToolDefinition>) -> Self {
        Self {
            definitions,
            working_dir: None,
        }
    }

    /// Set the working directory for commands
    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Check that every required parameter is present on the call.
    fn validate(call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            if param.required && !call.arguments.contains_key(&param.name) {
                return Err(format!(
                    "tool '{}' requires argument '{}'",
                    definition.name, param.name
                ));
            }
        }
        Ok(())
    }
}

impl Default for LocalToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn definitions(&self) -> Vec<ToolDefinition> {
        self.definitions.clone()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let definition = match self.definitions.iter().find(|d| d.name == call.name) {
            Some(d) => d,
            None => {
                return ToolResult::error(&call.id, format!("unknown tool: {}", call.name));
            }
        };

        if let Err(e) = Self::validate(call, definition) {
            return ToolResult::error(&call.id, e);
        }

        match call.name.as_str() {
            file::READ_FILE => file::execute_read_file(call),
            file::WRITE_FILE => file::execute_write_file(call),
            command::RUN_COMMAND => {
                // Inject the configured working directory unless the call
                // names its own
                if let Some(dir) = &self.working_dir
                    && call.get_string("working_dir").is_none()
                {
                    let modified = call.clone().with_arg("working_dir", json!(dir));
                    command::execute_run_command(&modified).await
                } else {
                    command::execute_run_command(call).await
                }
            }
            other => ToolResult::error(&call.id, format!("tool '{}' is not implemented", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_executor_has_all_tools() {
        let executor = LocalToolExecutor::new();
        assert!(executor.has_tool("read_file"));
        assert!(executor.has_tool("write_file"));
        assert!(executor.has_tool("run_command"));
    }

    #[test]
    fn test_executor_read_only() {
        let executor = LocalToolExecutor::read_only();
        assert!(executor.has_tool("read_file"));
        assert!(!executor.has_tool("write_file"));
        assert!(!executor.has_tool("run_command"));
    }

    #[tokio::test]
    async fn test_executor_unknown_tool() {
        let executor = LocalToolExecutor::new();
        let call = ToolCall::new("call_1", "unknown_tool");
        let result = executor.execute(&call).await;

        assert!(result.is_error);
        assert!(result.content.contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_executor_read_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "test content").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let executor = LocalToolExecutor::new();
        let call = ToolCall::new("call_1", "read_file").with_arg("path", json!(path));
        let result = executor.execute(&call).await;

        assert!(!result.is_error);
        assert!(result.content.contains("test content"));
    }

    #[tokio::test]
    async fn test_executor_write_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("test.txt");
        let path_str = path.to_str().unwrap();

        let executor = LocalToolExecutor::new();
        let call = ToolCall::new("call_1", "write_file")
            .with_arg("path", json!(path_str))
            .with_arg("content", json!("written content"));
        let result = executor.execute(&call).await;

        assert!(!result.is_error);
        assert_eq!(fs::read_to_string(&path).unwrap(), "written content");
    }

    #[tokio::test]
    async fn test_executor_injects_working_dir() {
        let temp_dir = tempdir().unwrap();
        let executor =
            LocalToolExecutor::new().with_working_dir(temp_dir.path().to_str().unwrap());

        let call = ToolCall::new("call_1", "run_command").with_arg("command", json!("pwd"));
        let result = executor.execute(&call).await;

        assert!(!result.is_error);
        let dir_name = temp_dir.path().file_name().unwrap().to_str().unwrap();
        assert!(result.content.contains(dir_name));
    }

    #[tokio::test]
    async fn test_executor_validation_error() {
        let executor = LocalToolExecutor::new();
        // Missing required 'path' parameter
        let call = ToolCall::new("call_1", "read_file");
        let result = executor.execute(&call).await;

        assert!(result.is_error);
        assert!(result.content.contains("requires argument 'path'"));
    }
}
