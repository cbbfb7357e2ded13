//! Raw TOML configuration data types
//!
//! These structs mirror the exact structure of `roundtable.toml`. They are
//! deserialized directly and converted into application-layer settings.

use roundtable_application::{GenerationParams, OrchestratorSettings};
use roundtable_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Participating models
    pub models: FileModelsConfig,
    /// Turn orchestration knobs
    pub orchestrator: FileOrchestratorConfig,
    /// Sampling parameters for generation calls
    pub generation: FileGenerationConfig,
    /// Tool execution settings
    pub tools: FileToolsConfig,
    /// Transcript persistence settings
    pub transcript: FileTranscriptConfig,
    /// HTTP provider endpoint settings
    pub provider: FileProviderConfig,
}

/// `[models]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model ids joining the conversation, in tie-break order.
    /// Empty means the built-in default roster.
    pub enabled: Vec<String>,
}

/// `[orchestrator]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Opt-in decisions below this confidence stay silent
    pub silence_threshold: f64,
    /// Per-model budget for one speaking evaluation call
    pub eval_timeout_secs: u64,
    /// Maximum tool-call rounds per model per turn
    pub max_tool_turns: usize,
    /// How many recent messages evaluation prompts include
    pub history_window: usize,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let defaults = OrchestratorSettings::default();
        Self {
            silence_threshold: defaults.silence_threshold,
            eval_timeout_secs: defaults.eval_timeout.as_secs(),
            max_tool_turns: defaults.max_tool_turns,
            history_window: defaults.history_window,
        }
    }
}

/// `[generation]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        let defaults = GenerationParams::default();
        Self {
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Whether models may call tools at all
    pub enabled: bool,
    /// High-risk tools cleared without asking (e.g. "write_file")
    pub auto_approve: Vec<String>,
    /// Working directory for run_command (default: process cwd)
    pub working_dir: Option<String>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_approve: Vec::new(),
            working_dir: None,
        }
    }
}

/// `[transcript]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTranscriptConfig {
    /// Whether conversations are persisted
    pub enabled: bool,
    /// Directory for transcript files (default: XDG data dir)
    pub dir: Option<String>,
}

/// `[provider]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of an OpenAI-compatible endpoint
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileConfig {
    /// Resolve the configured model roster.
    ///
    /// Unknown ids become [`Model::Custom`] rather than failing, so a
    /// config can name models this build has no pricing for.
    pub fn enabled_models(&self) -> Vec<Model> {
        if self.models.enabled.is_empty() {
            return Model::default_models();
        }
        self.models
            .enabled
            .iter()
            .map(|id| Model::from(id.as_str()))
            .collect()
    }

    /// Convert the raw file values into orchestrator settings.
    pub fn to_settings(&self) -> OrchestratorSettings {
        OrchestratorSettings::new(self.enabled_models())
            .with_silence_threshold(self.orchestrator.silence_threshold)
            .with_eval_timeout(Duration::from_secs(self.orchestrator.eval_timeout_secs))
            .with_max_tool_turns(self.orchestrator.max_tool_turns)
            .with_generation(GenerationParams {
                max_tokens: self.generation.max_tokens,
                temperature: self.generation.temperature,
            })
    }
}
