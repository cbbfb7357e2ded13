//! Model catalog: read-only display and pricing metadata.
//!
//! The catalog is loaded once at startup and injected into the components
//! that need it (cost estimation in provider adapters, display names in the
//! presentation layer). It is deliberately not ambient global state so tests
//! can substitute fixtures.

use crate::chat::usage::Usage;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-model metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Human-friendly name for display ("Claude Sonnet 4.5")
    pub display_name: String,
    /// USD per million prompt tokens
    pub prompt_cost_per_mtok: f64,
    /// USD per million completion tokens
    pub completion_cost_per_mtok: f64,
}

/// Read-only table of model metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelCatalog {
    entries: HashMap<Model, ModelInfo>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Catalog of the built-in model set.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            Model::ClaudeSonnet46,
            ModelInfo::new("Claude Sonnet 4.6", 3.0, 15.0),
        );
        catalog.insert(
            Model::ClaudeOpus46,
            ModelInfo::new("Claude Opus 4.6", 15.0, 75.0),
        );
        catalog.insert(
            Model::ClaudeSonnet45,
            ModelInfo::new("Claude Sonnet 4.5", 3.0, 15.0),
        );
        catalog.insert(
            Model::ClaudeHaiku45,
            ModelInfo::new("Claude Haiku 4.5", 1.0, 5.0),
        );
        catalog.insert(Model::Gpt52, ModelInfo::new("GPT-5.2", 1.75, 14.0));
        catalog.insert(Model::Gpt51, ModelInfo::new("GPT-5.1", 1.25, 10.0));
        catalog.insert(Model::Gpt5Mini, ModelInfo::new("GPT-5 mini", 0.25, 2.0));
        catalog.insert(
            Model::Gemini3Pro,
            ModelInfo::new("Gemini 3 Pro", 2.0, 12.0),
        );
        catalog
    }

    pub fn insert(&mut self, model: Model, info: ModelInfo) {
        self.entries.insert(model, info);
    }

    pub fn get(&self, model: &Model) -> Option<&ModelInfo> {
        self.entries.get(model)
    }

    /// Display name for a model, falling back to the raw id.
    pub fn display_name(&self, model: &Model) -> String {
        self.entries
            .get(model)
            .map(|info| info.display_name.clone())
            .unwrap_or_else(|| model.as_str().to_string())
    }

    /// Estimate the USD cost of a usage record, `None` for unknown models.
    pub fn estimate_cost(&self, model: &Model, usage: &Usage) -> Option<f64> {
        let info = self.entries.get(model)?;
        let prompt = usage.prompt_tokens as f64 * info.prompt_cost_per_mtok / 1_000_000.0;
        let completion =
            usage.completion_tokens as f64 * info.completion_cost_per_mtok / 1_000_000.0;
        Some(prompt + completion)
    }
}

impl ModelInfo {
    pub fn new(
        display_name: impl Into<String>,
        prompt_cost_per_mtok: f64,
        completion_cost_per_mtok: f64,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            prompt_cost_per_mtok,
            completion_cost_per_mtok,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(
            catalog.display_name(&Model::ClaudeSonnet45),
            "Claude Sonnet 4.5"
        );
        assert_eq!(
            catalog.display_name(&Model::Custom("local-llama".to_string())),
            "local-llama"
        );
    }

    #[test]
    fn test_cost_estimation() {
        let catalog = ModelCatalog::builtin();
        let usage = Usage::new(1_000_000, 1_000_000);

        let cost = catalog.estimate_cost(&Model::ClaudeSonnet45, &usage).unwrap();
        assert!((cost - 18.0).abs() < 1e-9);

        assert!(
            catalog
                .estimate_cost(&Model::Custom("local-llama".to_string()), &usage)
                .is_none()
        );
    }
}
