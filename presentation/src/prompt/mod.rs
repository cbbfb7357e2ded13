//! Interactive permission prompt

mod console;

pub use console::ConsolePermissionPrompt;
