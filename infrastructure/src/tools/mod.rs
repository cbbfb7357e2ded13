//! Built-in tool implementations
//!
//! Concrete tools the models can call during a turn: file access and
//! command execution. The executor dispatches by canonical tool name.

pub mod command;
pub mod file;

mod executor;

pub use executor::LocalToolExecutor;

use roundtable_domain::ToolDefinition;

/// All built-in tool definitions
pub fn default_tools() -> Vec<ToolDefinition> {
    vec![
        file::read_file_definition(),
        file::write_file_definition(),
        command::run_command_definition(),
    ]
}

/// Definitions for low-risk (read-only) tools only
pub fn read_only_tools() -> Vec<ToolDefinition> {
    vec![file::read_file_definition()]
}
