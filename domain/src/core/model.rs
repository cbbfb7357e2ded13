//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// A domain concept representing the independently-hosted models that can
/// share a roundtable conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Claude models
    ClaudeSonnet46,
    ClaudeOpus46,
    ClaudeSonnet45,
    ClaudeHaiku45,
    // GPT models
    Gpt52,
    Gpt51,
    Gpt5Mini,
    // Gemini models
    Gemini3Pro,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::ClaudeSonnet46 => "claude-sonnet-4.6",
            Model::ClaudeOpus46 => "claude-opus-4.6",
            Model::ClaudeSonnet45 => "claude-sonnet-4.5",
            Model::ClaudeHaiku45 => "claude-haiku-4.5",
            Model::Gpt52 => "gpt-5.2",
            Model::Gpt51 => "gpt-5.1",
            Model::Gpt5Mini => "gpt-5-mini",
            Model::Gemini3Pro => "gemini-3-pro-preview",
            Model::Custom(s) => s,
        }
    }

    /// Get the default set of models for a roundtable conversation
    pub fn default_models() -> Vec<Model> {
        vec![Model::ClaudeSonnet45, Model::Gpt52, Model::Gemini3Pro]
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(
            self,
            Model::ClaudeSonnet46
                | Model::ClaudeOpus46
                | Model::ClaudeSonnet45
                | Model::ClaudeHaiku45
        )
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        matches!(self, Model::Gpt52 | Model::Gpt51 | Model::Gpt5Mini)
    }

    /// Check if this is a Gemini model
    pub fn is_gemini(&self) -> bool {
        matches!(self, Model::Gemini3Pro)
    }

    /// Short family name, usable as a chat `@mention`
    pub fn family(&self) -> &str {
        if self.is_claude() {
            "claude"
        } else if self.is_gpt() {
            "gpt"
        } else if self.is_gemini() {
            "gemini"
        } else {
            self.as_str()
        }
    }

    /// Whether a parsed `@mention` token refers to this model.
    ///
    /// Mention identifiers cannot contain dots, so the full id is matched
    /// with dots folded to hyphens. The bare family name ("claude", "gpt",
    /// "gemini") also matches, which lets `@claude` address every Claude
    /// model in the conversation at once.
    pub fn matches_mention(&self, mention: &str) -> bool {
        let mention = mention.to_lowercase();
        let id = self.as_str().to_lowercase();
        mention == id || mention == id.replace('.', "-") || mention == self.family()
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s {
            "claude-sonnet-4.6" => Model::ClaudeSonnet46,
            "claude-opus-4.6" => Model::ClaudeOpus46,
            "claude-sonnet-4.5" => Model::ClaudeSonnet45,
            "claude-haiku-4.5" => Model::ClaudeHaiku45,
            "gpt-5.2" => Model::Gpt52,
            "gpt-5.1" => Model::Gpt51,
            "gpt-5-mini" => Model::Gpt5Mini,
            "gemini-3-pro-preview" => Model::Gemini3Pro,
            other => Model::Custom(other.to_string()),
        }
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Model::from(s))
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        let models = Model::default_models();
        for model in models {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "local-llama".parse().unwrap();
        assert_eq!(model, Model::Custom("local-llama".to_string()));
        assert_eq!(model.to_string(), "local-llama");
    }

    #[test]
    fn test_model_family_detection() {
        assert!(Model::ClaudeSonnet45.is_claude());
        assert!(Model::Gpt52.is_gpt());
        assert!(Model::Gemini3Pro.is_gemini());
        assert!(!Model::ClaudeSonnet45.is_gpt());
    }

    #[test]
    fn test_mention_matching() {
        assert!(Model::ClaudeSonnet45.matches_mention("claude-sonnet-4-5"));
        assert!(Model::ClaudeSonnet45.matches_mention("claude"));
        assert!(Model::ClaudeSonnet45.matches_mention("CLAUDE"));
        assert!(!Model::ClaudeSonnet45.matches_mention("gpt"));

        let custom = Model::Custom("local-llama".to_string());
        assert!(custom.matches_mention("local-llama"));
        assert!(!custom.matches_mention("llama"));
    }
}
