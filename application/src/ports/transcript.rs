//! Transcript port
//!
//! Defines how finished conversation entries are persisted. The
//! orchestrator records the user message and every completed response;
//! adapters decide where they land (JSONL file, nothing at all).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use roundtable_domain::{ChatMessage, Usage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while persisting transcript entries
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("Write failed: {0}")]
    WriteFailed(String),
}

/// One persisted line of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub message: ChatMessage,
    /// Usage attributed to this entry, when it completed a generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl TranscriptEntry {
    pub fn now(message: ChatMessage) -> Self {
        Self {
            timestamp: Utc::now(),
            message,
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Port for persisting conversation transcripts
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn record(&self, entry: TranscriptEntry) -> Result<(), TranscriptError>;
}

/// Store that discards every entry. Used when persistence is disabled.
pub struct NullTranscriptStore;

#[async_trait]
impl TranscriptStore for NullTranscriptStore {
    async fn record(&self, _entry: TranscriptEntry) -> Result<(), TranscriptError> {
        Ok(())
    }
}
