//! Conversation domain entities

use crate::core::model::Model;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in a shared conversation (Entity)
///
/// Unlike a single-model chat log, several assistants write into the same
/// history, so assistant and tool messages carry the [`Model`] that produced
/// them. Provider adapters use it to attribute lines when rendering the
/// shared history for another model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Which model authored this message. `None` for system and user messages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    /// Tool invocations requested in this message (assistant messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Results for earlier tool invocations (tool messages only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_results: Vec<ToolResult>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            model: None,
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            model: None,
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn assistant(model: Model, content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            model: Some(model),
            tool_calls: Vec::new(),
            tool_results: Vec::new(),
        }
    }

    pub fn tool(model: Model, results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            content: String::new(),
            model: Some(model),
            tool_calls: Vec::new(),
            tool_results: results,
        }
    }

    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.tool_calls = calls;
        self
    }
}

/// A roundtable conversation shared by every participating model (Entity)
///
/// History is append-only: messages are never edited or removed once added,
/// so each model sees the same prefix on its turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn with_system_prompt(system_prompt: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.push(ChatMessage::system(system_prompt));
        conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn add_assistant_message(&mut self, model: Model, content: impl Into<String>) {
        self.push(ChatMessage::assistant(model, content));
    }

    /// Most recent messages, newest last. Used to build evaluation prompts
    /// without shipping the entire history.
    pub fn tail(&self, count: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(count);
        &self.messages[start..]
    }
}
