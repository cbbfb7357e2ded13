//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration file loading, local tool execution,
//! risk-based permission gating, transcript persistence, and the HTTP
//! model client.

pub mod config;
pub mod permission;
pub mod providers;
pub mod tools;
pub mod transcript;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig};
pub use permission::RiskBasedGate;
pub use tools::{LocalToolExecutor, default_tools, read_only_tools};
pub use transcript::JsonlTranscriptStore;

#[cfg(feature = "http-client")]
pub use providers::OpenAiCompatClient;
