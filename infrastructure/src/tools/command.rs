//! Command execution tool: run_command

use roundtable_domain::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Tool name constant
pub const RUN_COMMAND: &str = "run_command";

/// Default timeout for command execution (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Maximum output size (1 MB)
const MAX_OUTPUT_SIZE: usize = 1024 * 1024;

/// Get the tool definition for run_command
pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command and return its output. Use with caution.",
        RiskLevel::High,
    )
    .with_parameter(
        ToolParameter::new("command", "The command to execute", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("working_dir", "Working directory for the command", false)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 60)", false)
            .with_type("number"),
    )
}

/// Execute the run_command tool
pub async fn execute_run_command(call: &ToolCall) -> ToolResult {
    let command_str = match call.require_string("command") {
        Ok(c) => c,
        Err(e) => return ToolResult::error(&call.id, e),
    };

    let working_dir = call.get_string("working_dir");
    let timeout_secs = call
        .get_i64("timeout_secs")
        .unwrap_or(DEFAULT_TIMEOUT_SECS as i64)
        .max(1) as u64;

    let mut cmd = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_str]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_str]);
        c
    };

    if let Some(dir) = working_dir {
        let path = std::path::Path::new(dir);
        if !path.exists() {
            return ToolResult::error(
                &call.id,
                format!("working directory does not exist: {}", dir),
            );
        }
        if !path.is_dir() {
            return ToolResult::error(&call.id, format!("'{}' is not a directory", dir));
        }
        cmd.current_dir(path);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let output = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        cmd.output(),
    )
    .await
    {
        Ok(Ok(o)) => o,
        Ok(Err(e)) => {
            return ToolResult::error(&call.id, format!("failed to spawn command: {}", e));
        }
        Err(_) => {
            return ToolResult::error(
                &call.id,
                format!("command timed out after {} seconds", timeout_secs),
            );
        }
    };

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    let mut combined = String::new();
    if !stdout.is_empty() {
        combined.push_str(&stdout);
    }
    if !stderr.is_empty() {
        if !combined.is_empty() {
            combined.push_str("\n--- stderr ---\n");
        }
        combined.push_str(&stderr);
    }

    if combined.len() > MAX_OUTPUT_SIZE {
        combined.truncate(MAX_OUTPUT_SIZE);
        combined.push_str("\n... (output truncated)");
    }

    // Non-zero exit is reported in the content, not as a tool error,
    // so the model can read the failure and decide what to do.
    if output.status.success() {
        ToolResult::success(&call.id, combined)
    } else {
        ToolResult::success(
            &call.id,
            format!("command exited with code {}\n{}", exit_code, combined),
        )
    }
}
