//! Configuration loading and raw file config types

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileGenerationConfig, FileModelsConfig, FileOrchestratorConfig, FileProviderConfig,
    FileToolsConfig, FileTranscriptConfig,
};
pub use loader::ConfigLoader;
