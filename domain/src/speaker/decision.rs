//! Speaker selection value objects.
//!
//! A [`SpeakerDecision`] records why a model will or will not speak this
//! turn. Decisions come from three places: mentions force a model in,
//! self-evaluation lets a model opt in or out, and evaluation failures
//! fail open so a flaky provider never silences a participant.

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Confidence assigned to decisions that bypass evaluation entirely.
pub const FORCED_CONFIDENCE: f64 = 1.0;

/// Neutral confidence used when an evaluation call fails or times out.
pub const FAIL_OPEN_CONFIDENCE: f64 = 0.5;

/// One model's verdict on whether it should speak this turn.
///
/// `confidence` always holds the raw evaluated value, even when a threshold
/// downgrade flips `should_speak` to false. Consumers that sort or display
/// decisions see what the model actually reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerDecision {
    pub model: Model,
    pub should_speak: bool,
    pub confidence: f64,
    pub reason: String,
    /// True when a mention or `@all` bypassed evaluation.
    pub is_forced: bool,
}

impl SpeakerDecision {
    /// Decision for a model forced to speak by a mention.
    pub fn forced(model: Model, reason: impl Into<String>) -> Self {
        Self {
            model,
            should_speak: true,
            confidence: FORCED_CONFIDENCE,
            reason: reason.into(),
            is_forced: true,
        }
    }

    /// Decision produced by a successful self-evaluation call.
    pub fn evaluated(
        model: Model,
        should_speak: bool,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            model,
            should_speak,
            confidence,
            reason: reason.into(),
            is_forced: false,
        }
    }

    /// Fail-open decision used when evaluation errors out or times out.
    /// The model speaks rather than being silently dropped.
    pub fn fail_open(model: Model, reason: impl Into<String>) -> Self {
        Self {
            model,
            should_speak: true,
            confidence: FAIL_OPEN_CONFIDENCE,
            reason: reason.into(),
            is_forced: false,
        }
    }

    /// Flip `should_speak` off when an opt-in falls below `threshold`.
    /// Forced decisions and opt-outs pass through unchanged, and the raw
    /// confidence is preserved either way.
    pub fn apply_threshold(mut self, threshold: f64) -> Self {
        if !self.is_forced && self.should_speak && self.confidence < threshold {
            self.should_speak = false;
        }
        self
    }
}

/// Which models a scanned user message forces into the turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForcedSpeakers {
    /// Lowercased mention identifiers from the message.
    pub mentions: Vec<String>,
    /// True when `@all` was present.
    pub force_all: bool,
}

impl ForcedSpeakers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            mentions: Vec::new(),
            force_all: true,
        }
    }

    pub fn from_mentions(mentions: Vec<String>, force_all: bool) -> Self {
        Self {
            mentions,
            force_all,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.force_all && self.mentions.is_empty()
    }

    /// Whether `model` is forced to speak by this scan.
    pub fn matches(&self, model: &Model) -> bool {
        self.force_all || self.mentions.iter().any(|m| model.matches_mention(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forced_decision_has_full_confidence() {
        let decision = SpeakerDecision::forced(Model::ClaudeSonnet45, "mentioned by name");
        assert!(decision.should_speak);
        assert!(decision.is_forced);
        assert_eq!(decision.confidence, FORCED_CONFIDENCE);
    }

    #[test]
    fn test_threshold_downgrades_weak_opt_in() {
        let decision = SpeakerDecision::evaluated(Model::Gpt52, true, 0.3, "mild interest")
            .apply_threshold(0.4);
        assert!(!decision.should_speak);
        assert_eq!(decision.confidence, 0.3);
    }

    #[test]
    fn test_threshold_keeps_strong_opt_in() {
        let decision = SpeakerDecision::evaluated(Model::Gpt52, true, 0.9, "directly relevant")
            .apply_threshold(0.4);
        assert!(decision.should_speak);
    }

    #[test]
    fn test_threshold_ignores_forced_and_opt_out() {
        let forced =
            SpeakerDecision::forced(Model::Gemini3Pro, "mentioned").apply_threshold(0.99);
        assert!(forced.should_speak);

        let opt_out = SpeakerDecision::evaluated(Model::Gpt52, false, 0.1, "nothing to add")
            .apply_threshold(0.4);
        assert!(!opt_out.should_speak);
        assert_eq!(opt_out.confidence, 0.1);
    }

    #[test]
    fn test_fail_open_speaks_with_neutral_confidence() {
        let decision = SpeakerDecision::fail_open(Model::Gpt52, "evaluation timed out");
        assert!(decision.should_speak);
        assert!(!decision.is_forced);
        assert_eq!(decision.confidence, FAIL_OPEN_CONFIDENCE);
    }

    #[test]
    fn test_forced_speakers_matching() {
        let forced = ForcedSpeakers::from_mentions(vec!["claude".to_string()], false);
        assert!(forced.matches(&Model::ClaudeSonnet45));
        assert!(forced.matches(&Model::ClaudeOpus46));
        assert!(!forced.matches(&Model::Gpt52));

        let everyone = ForcedSpeakers::all();
        assert!(everyone.matches(&Model::Gpt52));

        assert!(ForcedSpeakers::none().is_empty());
    }
}
