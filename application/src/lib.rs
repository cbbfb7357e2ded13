//! Application layer for roundtable
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::OrchestratorSettings;
pub use ports::{
    model_client::{ClientError, GenerationParams, ModelClient, StreamHandle},
    permission_gate::{AllowAllGate, DenyAllGate, GateVerdict, PermissionGate},
    tool_executor::ToolExecutorPort,
    transcript::{NullTranscriptStore, TranscriptEntry, TranscriptError, TranscriptStore},
    turn_event::{PermissionReply, PermissionRequest, TurnEvent},
};
pub use use_cases::evaluate_speakers::{EvaluateSpeakersInput, EvaluateSpeakersUseCase};
pub use use_cases::process_turn::{ProcessTurnInput, ProcessTurnUseCase, TurnHandle};
