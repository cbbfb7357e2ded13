//! Orchestrator settings
//!
//! Runtime knobs for turn processing. Infrastructure builds these from the
//! config file and CLI flags; tests construct them directly.

use crate::ports::model_client::GenerationParams;
use roundtable_domain::Model;
use std::time::Duration;

/// Settings governing speaker selection and turn execution.
///
/// `models` doubles as the tie-break order: when two speakers report the
/// same confidence, the one listed earlier goes first.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Participating models, in configured order.
    pub models: Vec<Model>,
    /// Opt-in decisions below this confidence are downgraded to silence.
    pub silence_threshold: f64,
    /// Per-model budget for one speaking evaluation call.
    pub eval_timeout: Duration,
    /// Maximum tool-call rounds per model per turn.
    pub max_tool_turns: usize,
    /// How many recent messages evaluation prompts include.
    pub history_window: usize,
    /// Sampling parameters for generation calls.
    pub generation: GenerationParams,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            models: Model::default_models(),
            silence_threshold: 0.4,
            eval_timeout: Duration::from_secs(30),
            max_tool_turns: 10,
            history_window: 20,
            generation: GenerationParams::default(),
        }
    }
}

impl OrchestratorSettings {
    pub fn new(models: Vec<Model>) -> Self {
        Self {
            models,
            ..Self::default()
        }
    }

    pub fn with_silence_threshold(mut self, threshold: f64) -> Self {
        self.silence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_eval_timeout(mut self, timeout: Duration) -> Self {
        self.eval_timeout = timeout;
        self
    }

    pub fn with_max_tool_turns(mut self, max_tool_turns: usize) -> Self {
        self.max_tool_turns = max_tool_turns;
        self
    }

    pub fn with_generation(mut self, generation: GenerationParams) -> Self {
        self.generation = generation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = OrchestratorSettings::default();
        assert_eq!(settings.silence_threshold, 0.4);
        assert_eq!(settings.eval_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_tool_turns, 10);
        assert!(!settings.models.is_empty());
    }

    #[test]
    fn test_threshold_is_clamped() {
        let settings = OrchestratorSettings::default().with_silence_threshold(1.5);
        assert_eq!(settings.silence_threshold, 1.0);

        let settings = OrchestratorSettings::default().with_silence_threshold(-0.1);
        assert_eq!(settings.silence_threshold, 0.0);
    }
}
