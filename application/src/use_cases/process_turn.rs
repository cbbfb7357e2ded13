//! Process turn use case
//!
//! Orchestrates one full turn of the roundtable: parse mentions, select
//! speakers, then let each speaker generate into the shared history,
//! running tools when it asks to. Progress is reported as a stream of
//! [`TurnEvent`]s ending in exactly one `TurnComplete`.

use crate::config::OrchestratorSettings;
use crate::ports::model_client::ModelClient;
use crate::ports::permission_gate::{GateVerdict, PermissionGate};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::transcript::{NullTranscriptStore, TranscriptEntry, TranscriptStore};
use crate::ports::turn_event::{PermissionReply, PermissionRequest, TurnEvent};
use crate::use_cases::evaluate_speakers::{EvaluateSpeakersInput, EvaluateSpeakersUseCase};
use roundtable_domain::{
    ChatMessage, Conversation, DomainError, FinishReason, ForcedSpeakers, Model, ModelCatalog,
    ModelResponse, PromptTemplate, SpeakerDecision, StreamEvent, ToolCall, ToolResult, Usage,
    parse_mentions,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Input for the ProcessTurn use case
#[derive(Debug, Clone)]
pub struct ProcessTurnInput {
    /// Snapshot of the shared history, without the new user message.
    pub conversation: Conversation,
    /// The raw user message, mention tokens included.
    pub user_message: String,
    /// Cancels the turn between steps. A cancelled turn still ends with
    /// `TurnComplete` carrying whatever finished.
    pub cancellation: CancellationToken,
}

impl ProcessTurnInput {
    pub fn new(conversation: Conversation, user_message: impl Into<String>) -> Self {
        Self {
            conversation,
            user_message: user_message.into(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }
}

/// Handle for receiving the event stream of a running turn.
///
/// Dropping the handle cancels the turn: the producer observes the
/// cancellation at its next await point and winds down without touching
/// the shared conversation.
pub struct TurnHandle {
    receiver: mpsc::Receiver<TurnEvent>,
    cancellation: CancellationToken,
}

impl TurnHandle {
    /// Receive the next event, `None` after `TurnComplete` was delivered.
    pub async fn next_event(&mut self) -> Option<TurnEvent> {
        self.receiver.recv().await
    }
}

impl Drop for TurnHandle {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

/// Use case for processing one user turn
pub struct ProcessTurnUseCase<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    client: Arc<C>,
    tools: Arc<T>,
    gate: Arc<G>,
    catalog: Arc<ModelCatalog>,
    settings: OrchestratorSettings,
    transcript: Arc<dyn TranscriptStore>,
}

impl<C, T, G> ProcessTurnUseCase<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    pub fn new(
        client: Arc<C>,
        tools: Arc<T>,
        gate: Arc<G>,
        catalog: Arc<ModelCatalog>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            client,
            tools,
            gate,
            catalog,
            settings,
            transcript: Arc::new(NullTranscriptStore),
        }
    }

    pub fn with_transcript(mut self, transcript: Arc<dyn TranscriptStore>) -> Self {
        self.transcript = transcript;
        self
    }

    /// Start processing a turn in the background and return the handle the
    /// presentation layer drains.
    pub fn start(&self, mut input: ProcessTurnInput) -> TurnHandle {
        let (tx, rx) = mpsc::channel(64);
        // Child token: dropping the handle cancels this turn without
        // touching a caller-owned token shared across turns.
        let cancellation = input.cancellation.child_token();
        input.cancellation = cancellation.clone();
        let runner = TurnRunner {
            client: Arc::clone(&self.client),
            tools: Arc::clone(&self.tools),
            gate: Arc::clone(&self.gate),
            catalog: Arc::clone(&self.catalog),
            settings: self.settings.clone(),
            transcript: Arc::clone(&self.transcript),
        };
        tokio::spawn(runner.run(input, tx));
        TurnHandle {
            receiver: rx,
            cancellation,
        }
    }
}

/// Outcome of one speaker's generation, private to the runner.
enum SpeakerOutcome {
    Done(ModelResponse),
    Failed(String),
    Cancelled,
}

struct TurnRunner<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    client: Arc<C>,
    tools: Arc<T>,
    gate: Arc<G>,
    catalog: Arc<ModelCatalog>,
    settings: OrchestratorSettings,
    transcript: Arc<dyn TranscriptStore>,
}

impl<C, T, G> TurnRunner<C, T, G>
where
    C: ModelClient + 'static,
    T: ToolExecutorPort + 'static,
    G: PermissionGate + 'static,
{
    async fn run(self, input: ProcessTurnInput, events: mpsc::Sender<TurnEvent>) {
        let (responses, usage) = self.run_inner(input, &events).await;
        // Exactly one TurnComplete, always last, on every path.
        let _ = events.send(TurnEvent::TurnComplete { responses, usage }).await;
    }

    async fn run_inner(
        &self,
        input: ProcessTurnInput,
        events: &mpsc::Sender<TurnEvent>,
    ) -> (Vec<ModelResponse>, Usage) {
        let mut responses: Vec<ModelResponse> = Vec::new();
        let mut usage = Usage::default();
        let cancellation = input.cancellation.clone();

        let _ = events.send(TurnEvent::Thinking).await;

        if self.settings.models.is_empty() {
            let _ = events
                .send(TurnEvent::Error {
                    model: None,
                    message: DomainError::NoModels.to_string(),
                })
                .await;
            return (responses, usage);
        }

        let scan = parse_mentions(&input.user_message);
        let forced = ForcedSpeakers::from_mentions(scan.mentions.clone(), scan.force_all);

        let mut conversation = input.conversation;
        // Evaluation prompts carry the new message separately, so the
        // history window is captured before it lands in the conversation.
        let history = conversation.tail(self.settings.history_window).to_vec();
        conversation.add_user_message(scan.clean_message.clone());
        self.record(TranscriptEntry::now(ChatMessage::user(
            scan.clean_message.clone(),
        )))
        .await;

        for model in &self.settings.models {
            if !forced.matches(model) {
                let _ = events
                    .send(TurnEvent::Evaluating {
                        model: model.clone(),
                    })
                    .await;
            }
        }

        let evaluator = EvaluateSpeakersUseCase::new(Arc::clone(&self.client), &self.settings);
        let eval_input = EvaluateSpeakersInput {
            history,
            user_message: scan.clean_message.clone(),
            forced,
        };

        let decisions = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                info!("Turn cancelled during speaker selection");
                return (responses, usage);
            }
            decisions = evaluator.execute(&self.settings.models, &eval_input) => decisions,
        };

        let mut speakers: Vec<SpeakerDecision> = Vec::new();
        for decision in decisions {
            let event = if decision.should_speak {
                TurnEvent::WillSpeak(decision.clone())
            } else {
                TurnEvent::WillStaySilent(decision.clone())
            };
            let _ = events.send(event).await;
            if decision.should_speak {
                speakers.push(decision);
            }
        }

        info!(
            speakers = speakers.len(),
            "Speaker selection complete"
        );

        let participants: Vec<String> = self
            .settings
            .models
            .iter()
            .map(|m| self.catalog.display_name(m))
            .collect();

        for speaker in &speakers {
            if cancellation.is_cancelled() {
                break;
            }
            match self
                .run_speaker(
                    &speaker.model,
                    &participants,
                    &mut conversation,
                    events,
                    &cancellation,
                )
                .await
            {
                SpeakerOutcome::Done(response) => {
                    usage += response.usage_or_default();
                    responses.push(response);
                }
                SpeakerOutcome::Failed(message) => {
                    warn!("Model {} failed: {}", speaker.model, message);
                    let _ = events
                        .send(TurnEvent::Error {
                            model: Some(speaker.model.clone()),
                            message,
                        })
                        .await;
                }
                SpeakerOutcome::Cancelled => break,
            }
        }

        (responses, usage)
    }

    /// Run one speaker's generation, including its tool loop. The shared
    /// conversation grows as the speaker finishes, so later speakers see
    /// earlier responses from the same turn.
    async fn run_speaker(
        &self,
        model: &Model,
        participants: &[String],
        conversation: &mut Conversation,
        events: &mpsc::Sender<TurnEvent>,
        cancellation: &CancellationToken,
    ) -> SpeakerOutcome {
        let _ = events
            .send(TurnEvent::ResponseStart {
                model: model.clone(),
            })
            .await;

        let system_prompt =
            PromptTemplate::group_chat_system(&self.catalog.display_name(model), participants);
        let tools = self.tools.definitions();
        let mut turn_usage = Usage::default();
        let mut tool_rounds = 0usize;

        loop {
            let handle = match self
                .client
                .generate(
                    model,
                    &system_prompt,
                    conversation,
                    &tools,
                    &self.settings.generation,
                )
                .await
            {
                Ok(handle) => handle,
                Err(e) => return SpeakerOutcome::Failed(e.to_string()),
            };

            let mut response = match self
                .stream_response(model, handle, events, cancellation)
                .await
            {
                Ok(Some(response)) => response,
                Ok(None) => return SpeakerOutcome::Cancelled,
                Err(message) => return SpeakerOutcome::Failed(message),
            };
            turn_usage += response.usage_or_default();

            if response.has_tool_calls() {
                tool_rounds += 1;
                if tool_rounds > self.settings.max_tool_turns {
                    let _ = events
                        .send(TurnEvent::Error {
                            model: Some(model.clone()),
                            message: format!(
                                "tool call limit reached ({} rounds)",
                                self.settings.max_tool_turns
                            ),
                        })
                        .await;
                    response.finish_reason = FinishReason::Stop;
                    response.tool_calls.clear();
                    return self
                        .finish_speaker(model, response, turn_usage, conversation, events)
                        .await;
                }

                let calls = response.tool_calls.clone();
                for call in &calls {
                    let _ = events
                        .send(TurnEvent::ToolCallRequested {
                            model: model.clone(),
                            call: call.clone(),
                        })
                        .await;
                }

                let mut results = Vec::new();
                for call in &calls {
                    if cancellation.is_cancelled() {
                        return SpeakerOutcome::Cancelled;
                    }
                    let result = self
                        .clear_and_execute(model, call, events, cancellation)
                        .await;
                    let _ = events
                        .send(TurnEvent::ToolResultReady {
                            model: model.clone(),
                            result: result.clone(),
                        })
                        .await;
                    results.push(result);
                }

                conversation.push(
                    ChatMessage::assistant(model.clone(), response.content.clone())
                        .with_tool_calls(calls),
                );
                conversation.push(ChatMessage::tool(model.clone(), results));
                continue;
            }

            return self
                .finish_speaker(model, response, turn_usage, conversation, events)
                .await;
        }
    }

    /// Seal a speaker's final response: attach cumulative usage and cost,
    /// append to history, persist, and emit `ResponseComplete`.
    async fn finish_speaker(
        &self,
        model: &Model,
        mut response: ModelResponse,
        mut turn_usage: Usage,
        conversation: &mut Conversation,
        events: &mpsc::Sender<TurnEvent>,
    ) -> SpeakerOutcome {
        if let Some(cost) = self.catalog.estimate_cost(model, &turn_usage) {
            turn_usage = turn_usage.with_cost(cost);
        }
        response.usage = (!turn_usage.is_empty()).then_some(turn_usage);

        conversation.add_assistant_message(model.clone(), response.content.clone());
        let mut entry =
            TranscriptEntry::now(ChatMessage::assistant(model.clone(), response.content.clone()));
        if let Some(usage) = response.usage {
            entry = entry.with_usage(usage);
        }
        self.record(entry).await;

        let _ = events
            .send(TurnEvent::ResponseComplete {
                model: model.clone(),
                response: response.clone(),
            })
            .await;
        SpeakerOutcome::Done(response)
    }

    /// Stream one generation call, forwarding chunks as events.
    ///
    /// Returns `Ok(None)` when the turn was cancelled mid-stream.
    async fn stream_response(
        &self,
        model: &Model,
        mut handle: crate::ports::model_client::StreamHandle,
        events: &mpsc::Sender<TurnEvent>,
        cancellation: &CancellationToken,
    ) -> Result<Option<ModelResponse>, String> {
        let mut full_text = String::new();
        loop {
            let event = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Ok(None),
                event = handle.next_event() => event,
            };
            match event {
                Some(StreamEvent::Delta(chunk)) => {
                    let _ = events
                        .send(TurnEvent::ResponseChunk {
                            model: model.clone(),
                            text: chunk.clone(),
                        })
                        .await;
                    full_text.push_str(&chunk);
                }
                Some(StreamEvent::Completed(mut response)) => {
                    if response.content.is_empty() && !full_text.is_empty() {
                        response.content = full_text;
                    }
                    return Ok(Some(response));
                }
                Some(StreamEvent::Error(e)) => return Err(e),
                None => {
                    // Stream closed without a terminal event
                    return Ok(Some(ModelResponse {
                        model: model.clone(),
                        content: full_text,
                        finish_reason: FinishReason::Stop,
                        tool_calls: Vec::new(),
                        usage: None,
                    }));
                }
            }
        }
    }

    /// Put one tool call through the permission gate and execute it if
    /// cleared. Refusals come back as error results so the model sees the
    /// call did not run.
    async fn clear_and_execute(
        &self,
        model: &Model,
        call: &ToolCall,
        events: &mpsc::Sender<TurnEvent>,
        cancellation: &CancellationToken,
    ) -> ToolResult {
        let Some(definition) = self.tools.definition(&call.name) else {
            return ToolResult::error(&call.id, format!("unknown tool: {}", call.name));
        };

        let verdict = self.gate.assess(call, &definition);
        debug!(tool = %call.name, ?verdict, "Gate verdict");
        match verdict {
            GateVerdict::Allow => self.execute_cleared(model, call, events).await,
            GateVerdict::Deny { reason } => ToolResult::denied(&call.id, reason),
            GateVerdict::AskUser => {
                let (request, reply) = PermissionRequest::new(call.clone());
                let _ = events
                    .send(TurnEvent::ToolPermissionRequest {
                        model: model.clone(),
                        request,
                    })
                    .await;

                let reply = tokio::select! {
                    biased;
                    _ = cancellation.cancelled() => {
                        return ToolResult::denied(&call.id, "turn cancelled");
                    }
                    reply = reply => reply,
                };
                match reply {
                    Ok(PermissionReply::Allow) => {
                        self.execute_cleared(model, call, events).await
                    }
                    Ok(PermissionReply::Deny { reason }) => ToolResult::denied(&call.id, reason),
                    Err(_) => ToolResult::denied(&call.id, "no decision received"),
                }
            }
        }
    }

    async fn execute_cleared(
        &self,
        model: &Model,
        call: &ToolCall,
        events: &mpsc::Sender<TurnEvent>,
    ) -> ToolResult {
        let _ = events
            .send(TurnEvent::ToolExecuting {
                model: model.clone(),
                call: call.clone(),
            })
            .await;
        self.tools.execute(call).await
    }

    async fn record(&self, entry: TranscriptEntry) {
        if let Err(e) = self.transcript.record(entry).await {
            warn!("Failed to record transcript entry: {}", e);
        }
    }
}
