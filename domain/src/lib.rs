//! Domain layer for roundtable
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Roundtable
//!
//! Several independently-hosted models share one conversation with a human:
//!
//! - **Mentions**: `@claude`, `@gpt-5-2`, `@all` force participants to speak
//! - **Self-evaluation**: unmentioned models judge for themselves whether
//!   they have something to add, and stay silent otherwise
//!
//! ## Turns
//!
//! Each user message opens a turn: speakers are selected, then each speaker
//! generates into the shared history, running tools when it asks to.

pub mod chat;
pub mod core;
pub mod mention;
pub mod prompt;
pub mod speaker;
pub mod tool;

// Re-export commonly used types
pub use chat::{
    entities::{ChatMessage, Conversation, Role},
    response::{FinishReason, ModelResponse},
    stream::StreamEvent,
    usage::Usage,
};
pub use core::{
    catalog::{ModelCatalog, ModelInfo},
    error::DomainError,
    model::Model,
};
pub use mention::{MentionScan, parse_mentions};
pub use prompt::PromptTemplate;
pub use speaker::{
    decision::{FAIL_OPEN_CONFIDENCE, FORCED_CONFIDENCE, ForcedSpeakers, SpeakerDecision},
    parsing::{SpeakVerdict, extract_json_object, parse_speak_verdict},
};
pub use tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolResult,
};
