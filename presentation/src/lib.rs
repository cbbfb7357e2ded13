//! Presentation layer for roundtable
//!
//! This crate renders the turn event stream to the console, asks the
//! human about gated tool calls, and hosts the interactive chat REPL.

pub mod chat;
pub mod output;
pub mod prompt;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use output::ConsoleRenderer;
pub use prompt::ConsolePermissionPrompt;
