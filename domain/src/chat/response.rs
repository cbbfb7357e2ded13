//! Structured generation results returned by provider adapters.
//!
//! A [`ModelResponse`] is what a provider hands back after one generation
//! call: the text, any tool invocations, why generation stopped, and the
//! token usage for the call. The orchestrator inspects `finish_reason` to
//! decide whether a tool loop iteration follows.

use crate::chat::usage::Usage;
use crate::core::model::Model;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural end of response.
    Stop,
    /// The model requested tool execution. Results must be fed back before
    /// the model can continue.
    ToolUse,
    /// Hit the token limit. Content may be truncated.
    Length,
    /// The provider filtered the output.
    ContentFilter,
    /// Provider-specific reason not covered above.
    Other(String),
}

/// One model's complete output for a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub model: Model,
    pub content: String,
    pub finish_reason: FinishReason,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ModelResponse {
    /// Text-only response that ended naturally.
    pub fn from_text(model: Model, content: impl Into<String>) -> Self {
        Self {
            model,
            content: content.into(),
            finish_reason: FinishReason::Stop,
            tool_calls: Vec::new(),
            usage: None,
        }
    }

    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.tool_calls = calls;
        if !self.tool_calls.is_empty() {
            self.finish_reason = FinishReason::ToolUse;
        }
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Usage for this call, zero when the provider reported none.
    pub fn usage_or_default(&self) -> Usage {
        self.usage.unwrap_or_default()
    }
}
