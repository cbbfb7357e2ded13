//! Evaluate speakers use case
//!
//! Asks every unmentioned model, in parallel, whether it wants to respond
//! to the latest user message. Mentioned models skip evaluation and are
//! forced in. Evaluation never blocks a turn: failures, timeouts, and
//! unparseable replies all fail open so a flaky provider cannot silence a
//! participant.

use crate::config::OrchestratorSettings;
use crate::ports::model_client::ModelClient;
use roundtable_domain::{
    ChatMessage, ForcedSpeakers, Model, PromptTemplate, SpeakerDecision, parse_speak_verdict,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Input for the EvaluateSpeakers use case
#[derive(Debug, Clone)]
pub struct EvaluateSpeakersInput {
    /// Recent shared history, oldest first.
    pub history: Vec<ChatMessage>,
    /// The user message with mention tokens already removed.
    pub user_message: String,
    /// Models forced in by mentions.
    pub forced: ForcedSpeakers,
}

/// Use case for selecting which models speak this turn
pub struct EvaluateSpeakersUseCase<C: ModelClient + 'static> {
    client: Arc<C>,
    silence_threshold: f64,
    eval_timeout: Duration,
}

impl<C: ModelClient + 'static> EvaluateSpeakersUseCase<C> {
    pub fn new(client: Arc<C>, settings: &OrchestratorSettings) -> Self {
        Self {
            client,
            silence_threshold: settings.silence_threshold,
            eval_timeout: settings.eval_timeout,
        }
    }

    /// Produce one decision per reachable candidate model.
    ///
    /// Candidates the client cannot reach are dropped up front and never
    /// get a decision. The result is sorted by confidence descending;
    /// equal confidence preserves the candidate order, so the configured
    /// model order breaks ties deterministically.
    pub async fn execute(
        &self,
        candidates: &[Model],
        input: &EvaluateSpeakersInput,
    ) -> Vec<SpeakerDecision> {
        let candidates = self.reachable(candidates).await;

        let mut forced_decisions: Vec<SpeakerDecision> = Vec::new();
        let mut to_evaluate: Vec<Model> = Vec::new();

        for model in &candidates {
            if input.forced.force_all {
                forced_decisions.push(SpeakerDecision::forced(
                    model.clone(),
                    "addressed to everyone",
                ));
            } else if input.forced.matches(model) {
                forced_decisions.push(SpeakerDecision::forced(model.clone(), "mentioned by name"));
            } else {
                to_evaluate.push(model.clone());
            }
        }

        debug!(
            forced = forced_decisions.len(),
            evaluating = to_evaluate.len(),
            "Selecting speakers"
        );

        let evaluated = self.evaluate_parallel(&to_evaluate, input).await;

        // Rebuild in candidate order so the later stable sort has a
        // deterministic tie-break.
        let mut by_model: HashMap<Model, SpeakerDecision> = forced_decisions
            .into_iter()
            .chain(evaluated)
            .map(|d| (d.model.clone(), d))
            .collect();

        let mut decisions: Vec<SpeakerDecision> = candidates
            .iter()
            .filter_map(|m| by_model.remove(m))
            .collect();
        decisions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        decisions
    }

    /// Filter candidates down to models the client can currently reach.
    ///
    /// If the client cannot even list its models, every candidate is kept;
    /// per-call failures fail open later anyway.
    async fn reachable(&self, candidates: &[Model]) -> Vec<Model> {
        match self.client.available_models().await {
            Ok(available) => {
                let kept: Vec<Model> = candidates
                    .iter()
                    .filter(|m| available.contains(m))
                    .cloned()
                    .collect();
                if kept.len() < candidates.len() {
                    debug!(
                        excluded = candidates.len() - kept.len(),
                        "Excluded unreachable models from this turn"
                    );
                }
                kept
            }
            Err(e) => {
                warn!("Could not list available models: {}", e);
                candidates.to_vec()
            }
        }
    }

    /// Fan the evaluation call out to all unmentioned candidates at once.
    async fn evaluate_parallel(
        &self,
        models: &[Model],
        input: &EvaluateSpeakersInput,
    ) -> Vec<SpeakerDecision> {
        if models.is_empty() {
            return Vec::new();
        }

        let prompt = Arc::new(PromptTemplate::speak_evaluation(
            &input.history,
            &input.user_message,
        ));

        let mut join_set = JoinSet::new();
        for model in models {
            let client = Arc::clone(&self.client);
            let prompt = Arc::clone(&prompt);
            let model = model.clone();
            let timeout = self.eval_timeout;

            join_set.spawn(async move {
                let result = tokio::time::timeout(
                    timeout,
                    client.complete(&model, PromptTemplate::speak_evaluation_system(), &prompt),
                )
                .await;
                (model, result)
            });
        }

        let mut decisions = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((model, Ok(Ok(response)))) => {
                    decisions.push(self.decision_from_response(model, &response));
                }
                Ok((model, Ok(Err(e)))) => {
                    warn!("Evaluation call for {} failed: {}", model, e);
                    decisions.push(SpeakerDecision::fail_open(model, "evaluation failed"));
                }
                Ok((model, Err(_))) => {
                    warn!("Evaluation call for {} timed out", model);
                    decisions.push(SpeakerDecision::fail_open(model, "evaluation timed out"));
                }
                Err(e) => {
                    warn!("Evaluation task join error: {}", e);
                }
            }
        }
        decisions
    }

    fn decision_from_response(&self, model: Model, response: &str) -> SpeakerDecision {
        match parse_speak_verdict(response) {
            Some(verdict) => {
                debug!(
                    %model,
                    should_speak = verdict.should_speak,
                    confidence = verdict.confidence,
                    "Parsed speak verdict"
                );
                SpeakerDecision::evaluated(
                    model,
                    verdict.should_speak,
                    verdict.confidence,
                    verdict.reason,
                )
                .apply_threshold(self.silence_threshold)
            }
            None => {
                warn!("Unparseable evaluation response from {}", model);
                SpeakerDecision::fail_open(model, "unparseable evaluation response")
            }
        }
    }
}
