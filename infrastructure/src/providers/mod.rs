//! Model client adapters

#[cfg(feature = "http-client")]
mod openai_compat;

#[cfg(feature = "http-client")]
pub use openai_compat::OpenAiCompatClient;
