//! Model client port
//!
//! Defines the interface for communicating with LLM providers.

use async_trait::async_trait;
use roundtable_domain::{
    Conversation, FinishReason, Model, ModelResponse, StreamEvent, ToolDefinition,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during model client operations
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Sampling parameters for a generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

/// Client for model communication
///
/// This port defines how the application layer talks to LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
///
/// `complete` is the lightweight one-shot call used for speaking
/// evaluation; `generate` is the full streaming call used for turn
/// responses, with the shared conversation and tool definitions attached.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Models this client can reach.
    async fn available_models(&self) -> Result<Vec<Model>, ClientError>;

    /// One-shot completion without history or tools.
    async fn complete(
        &self,
        model: &Model,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String, ClientError>;

    /// Start a streaming generation over the shared conversation.
    async fn generate(
        &self,
        model: &Model,
        system_prompt: &str,
        conversation: &Conversation,
        tools: &[ToolDefinition],
        params: &GenerationParams,
    ) -> Result<StreamHandle, ClientError>;

    /// Rough token count for context-budget decisions.
    ///
    /// The default is a whitespace split; adapters with a real tokenizer
    /// should override it.
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

/// Handle for receiving streaming events from a generation call.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Handle that yields a single `Completed` event. Useful for adapters
    /// whose transport has no streaming mode.
    pub fn from_response(response: ModelResponse) -> Self {
        let (tx, rx) = mpsc::channel(1);
        // If the receiver is dropped before reading, that's fine
        let _ = tx.try_send(StreamEvent::Completed(response));
        Self::new(rx)
    }

    /// Receive the next event, `None` when the stream is exhausted.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }

    /// Consume the stream into the final [`ModelResponse`], invoking
    /// `on_delta` for each text chunk as it arrives.
    ///
    /// When the channel closes without a terminal event, the accumulated
    /// deltas are promoted to a complete response rather than dropped.
    pub async fn collect_response(
        mut self,
        model: &Model,
        mut on_delta: impl FnMut(&str),
    ) -> Result<ModelResponse, ClientError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    on_delta(&chunk);
                    full_text.push_str(&chunk);
                }
                StreamEvent::Completed(mut response) => {
                    if response.content.is_empty() && !full_text.is_empty() {
                        response.content = full_text;
                    }
                    return Ok(response);
                }
                StreamEvent::Error(e) => {
                    return Err(ClientError::RequestFailed(e));
                }
            }
        }
        // Channel closed without a terminal event; keep what we have
        Ok(ModelResponse {
            model: model.clone(),
            content: full_text,
            finish_reason: FinishReason::Stop,
            tool_calls: Vec::new(),
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_response_accumulates_deltas() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("Hel".to_string())).await.unwrap();
        tx.send(StreamEvent::Delta("lo".to_string())).await.unwrap();
        tx.send(StreamEvent::Completed(ModelResponse::from_text(
            Model::Gpt52,
            "Hello",
        )))
        .await
        .unwrap();
        drop(tx);

        let mut chunks = Vec::new();
        let response = StreamHandle::new(rx)
            .collect_response(&Model::Gpt52, |chunk| chunks.push(chunk.to_string()))
            .await
            .unwrap();

        assert_eq!(response.content, "Hello");
        assert_eq!(chunks, vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_collect_response_promotes_deltas_on_silent_close() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Delta("partial".to_string()))
            .await
            .unwrap();
        drop(tx);

        let response = StreamHandle::new(rx)
            .collect_response(&Model::Gpt52, |_| {})
            .await
            .unwrap();
        assert_eq!(response.content, "partial");
        assert_eq!(response.finish_reason, FinishReason::Stop);
    }

    #[tokio::test]
    async fn test_collect_response_surfaces_stream_errors() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(StreamEvent::Error("boom".to_string())).await.unwrap();
        drop(tx);

        let result = StreamHandle::new(rx)
            .collect_response(&Model::Gpt52, |_| {})
            .await;
        assert!(matches!(result, Err(ClientError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_from_response_yields_single_completed() {
        let mut handle = StreamHandle::from_response(ModelResponse::from_text(
            Model::ClaudeSonnet45,
            "hi",
        ));
        let event = handle.next_event().await.unwrap();
        assert!(event.is_terminal());
        assert!(handle.next_event().await.is_none());
    }
}
