//! Turn event types emitted by the orchestrator for presentation rendering
//!
//! These events form the output port from the application layer to the
//! presentation layer: one turn produces a stream of `TurnEvent`s ending
//! in exactly one `TurnComplete`. The presentation layer receives the
//! stream and renders it (REPL output today, other frontends later).

use roundtable_domain::{Model, ModelResponse, SpeakerDecision, ToolCall, ToolResult, Usage};
use tokio::sync::oneshot;

/// Events emitted while processing one user turn.
///
/// Ordering guarantees: `ResponseChunk`s for a model arrive between that
/// model's `ResponseStart` and `ResponseComplete`; `TurnComplete` is
/// always the final event, exactly once, even after errors or
/// cancellation.
#[derive(Debug)]
pub enum TurnEvent {
    // === Speaker selection ===
    /// The turn has started and speaker selection is underway.
    Thinking,
    /// A model is evaluating whether it should speak.
    Evaluating { model: Model },
    /// A model will speak this turn.
    WillSpeak(SpeakerDecision),
    /// A model considered the message and stays silent.
    WillStaySilent(SpeakerDecision),

    // === Generation ===
    /// A model started generating its response.
    ResponseStart { model: Model },
    /// A streamed chunk of a model's response.
    ResponseChunk { model: Model, text: String },
    /// A model finished its response.
    ResponseComplete {
        model: Model,
        response: ModelResponse,
    },

    // === Tool execution ===
    /// A model requested a tool call.
    ToolCallRequested { model: Model, call: ToolCall },
    /// The human must approve or deny a tool call before it runs.
    ToolPermissionRequest {
        model: Model,
        request: PermissionRequest,
    },
    /// A tool call was cleared and is executing.
    ToolExecuting { model: Model, call: ToolCall },
    /// A tool call finished (or was refused).
    ToolResultReady { model: Model, result: ToolResult },

    // === Errors & completion ===
    /// A recoverable error. `model` is set when one participant failed
    /// and the turn continues with the others.
    Error {
        model: Option<Model>,
        message: String,
    },
    /// The turn is over. Always the last event.
    TurnComplete {
        responses: Vec<ModelResponse>,
        usage: Usage,
    },
}

impl TurnEvent {
    /// Returns true if this event ends the turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnEvent::TurnComplete { .. })
    }
}

/// An in-flight request for permission to run a tool call.
///
/// Carries the call under review and a one-shot responder. Dropping the
/// request without answering counts as denial, so an exiting frontend can
/// never leave a tool half-approved.
#[derive(Debug)]
pub struct PermissionRequest {
    pub call: ToolCall,
    responder: oneshot::Sender<PermissionReply>,
}

/// The human's answer to a [`PermissionRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionReply {
    Allow,
    Deny { reason: String },
}

impl PermissionRequest {
    /// Create a request and the receiver the orchestrator waits on.
    pub fn new(call: ToolCall) -> (Self, oneshot::Receiver<PermissionReply>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                call,
                responder: tx,
            },
            rx,
        )
    }

    pub fn allow(self) {
        let _ = self.responder.send(PermissionReply::Allow);
    }

    pub fn deny(self, reason: impl Into<String>) {
        let _ = self.responder.send(PermissionReply::Deny {
            reason: reason.into(),
        });
    }
}
