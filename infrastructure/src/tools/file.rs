//! File operation tools: read_file, write_file

use roundtable_domain::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolResult};
use std::fs;
use std::path::Path;

/// Tool name constants
pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";

/// Maximum file size to read (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Get the tool definition for read_file
pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        READ_FILE,
        "Read the contents of a file at the specified path",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to read", true).with_type("path"))
    .with_parameter(
        ToolParameter::new(
            "offset",
            "Line number to start reading from (0-indexed)",
            false,
        )
        .with_type("number"),
    )
    .with_parameter(
        ToolParameter::new("limit", "Maximum number of lines to read", false).with_type("number"),
    )
}

/// Get the tool definition for write_file
pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file at the specified path. Creates the file if it doesn't exist, or overwrites if it does.",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file to write", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write to the file", true).with_type("string"))
    .with_parameter(
        ToolParameter::new("create_dirs", "Create parent directories if they don't exist", false)
            .with_type("boolean"),
    )
}

/// Execute the read_file tool
pub fn execute_read_file(call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::error(&call.id, e),
    };

    let path = Path::new(path_str);

    if !path.exists() {
        return ToolResult::error(&call.id, format!("file not found: {}", path_str));
    }

    if !path.is_file() {
        return ToolResult::error(&call.id, format!("'{}' is not a file", path_str));
    }

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            return ToolResult::error(&call.id, format!("failed to read file metadata: {}", e));
        }
    };

    if metadata.len() > MAX_READ_SIZE {
        return ToolResult::error(
            &call.id,
            format!(
                "file too large ({} bytes, maximum is {} bytes)",
                metadata.len(),
                MAX_READ_SIZE
            ),
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return ToolResult::error(&call.id, format!("failed to read file: {}", e)),
    };

    // Optional line windowing
    let offset = call.get_i64("offset").unwrap_or(0).max(0) as usize;
    let limit = call.get_i64("limit");

    let output = if offset > 0 || limit.is_some() {
        let lines: Vec<&str> = content.lines().collect();
        let total_lines = lines.len();

        if offset >= total_lines {
            String::new()
        } else {
            let end = match limit {
                Some(l) => (offset + l.max(0) as usize).min(total_lines),
                None => total_lines,
            };
            lines[offset..end].join("\n")
        }
    } else {
        content
    };

    ToolResult::success(&call.id, output)
}

/// Execute the write_file tool
pub fn execute_write_file(call: &ToolCall) -> ToolResult {
    let path_str = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::error(&call.id, e),
    };

    let content = match call.require_string("content") {
        Ok(c) => c,
        Err(e) => return ToolResult::error(&call.id, e),
    };

    let path = Path::new(path_str);

    let create_dirs = call.get_bool("create_dirs").unwrap_or(false);
    if create_dirs
        && let Some(parent) = path.parent()
        && !parent.exists()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return ToolResult::error(
            &call.id,
            format!("failed to create parent directories: {}", e),
        );
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        return ToolResult::error(
            &call.id,
            format!("parent directory does not exist: {}", parent.display()),
        );
    }

    let bytes = content.len();
    if let Err(e) = fs::write(path, content) {
        return ToolResult::error(&call.id, format!("failed to write file: {}", e));
    }

    ToolResult::success(&call.id, format!("wrote {} bytes to {}", bytes, path_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file_success() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Hello, World!").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let call = ToolCall::new("call_1", READ_FILE).with_arg("path", json!(path));
        let result = execute_read_file(&call);

        assert!(!result.is_error);
        assert!(result.content.contains("Hello, World!"));
    }

    #[test]
    fn test_read_file_not_found() {
        let call =
            ToolCall::new("call_1", READ_FILE).with_arg("path", json!("/nonexistent/file.txt"));
        let result = execute_read_file(&call);

        assert!(result.is_error);
        assert!(result.content.contains("not found"));
    }

    #[test]
    fn test_read_file_with_offset_and_limit() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "line1\nline2\nline3\nline4\nline5").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let call = ToolCall::new("call_1", READ_FILE)
            .with_arg("path", json!(path))
            .with_arg("offset", json!(1))
            .with_arg("limit", json!(2));
        let result = execute_read_file(&call);

        assert!(!result.is_error);
        assert!(result.content.contains("line2"));
        assert!(result.content.contains("line3"));
        assert!(!result.content.contains("line1"));
        assert!(!result.content.contains("line4"));
    }

    #[test]
    fn test_write_file_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.txt");
        let path_str = path.to_str().unwrap();

        let call = ToolCall::new("call_1", WRITE_FILE)
            .with_arg("path", json!(path_str))
            .with_arg("content", json!("Hello, World!"));
        let result = execute_write_file(&call);

        assert!(!result.is_error);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_write_file_create_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("subdir").join("test.txt");
        let path_str = path.to_str().unwrap();

        let call = ToolCall::new("call_1", WRITE_FILE)
            .with_arg("path", json!(path_str))
            .with_arg("content", json!("content"))
            .with_arg("create_dirs", json!(true));
        let result = execute_write_file(&call);

        assert!(!result.is_error);
        assert!(path.exists());
    }

    #[test]
    fn test_write_file_parent_not_exists() {
        let call = ToolCall::new("call_1", WRITE_FILE)
            .with_arg("path", json!("/nonexistent/dir/file.txt"))
            .with_arg("content", json!("content"));
        let result = execute_write_file(&call);

        assert!(result.is_error);
        assert!(result.content.contains("does not exist"));
    }

    #[test]
    fn test_missing_required_argument() {
        let call = ToolCall::new("call_1", WRITE_FILE).with_arg("content", json!("content"));
        let result = execute_write_file(&call);

        assert!(result.is_error);
        assert!(result.content.contains("path"));
    }
}
