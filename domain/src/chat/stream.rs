//! Streaming events for one model's generation call.
//!
//! [`StreamEvent`] bridges infrastructure-level streaming (SSE chunks from a
//! provider) to the application layer. The orchestrator forwards deltas as
//! they arrive and folds the terminal event into the turn result.

use super::response::ModelResponse;

/// An event in a streaming generation response.
///
/// `Delta` events may arrive zero or more times; exactly one terminal event
/// (`Completed` or `Error`) ends the stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A text chunk from the model.
    Delta(String),
    /// The full structured response (signals stream end).
    Completed(ModelResponse),
    /// An error that occurred during streaming (signals stream end).
    Error(String),
}

impl StreamEvent {
    /// Returns the chunk text if this is a `Delta` event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed(_) | StreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Model;

    #[test]
    fn test_delta_carries_text_and_is_not_terminal() {
        let event = StreamEvent::Delta("hello".to_string());
        assert_eq!(event.text(), Some("hello"));
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_completed_is_terminal() {
        let response = ModelResponse::from_text(Model::ClaudeSonnet45, "done");
        let event = StreamEvent::Completed(response);
        assert!(event.is_terminal());
        assert_eq!(event.text(), None);
    }

    #[test]
    fn test_error_is_terminal() {
        let event = StreamEvent::Error("connection reset".to_string());
        assert!(event.is_terminal());
        assert_eq!(event.text(), None);
    }
}
