//! AI Integration Layer
//!
//! Text-generation providers and raw response handling.

pub mod prompt;
pub mod provider;
pub mod validation;

pub use prompt::PromptTemplates;
pub use provider::{
    LlmProvider, OllamaCliProvider, OllamaProvider, ProviderConfig, SharedProvider,
    create_provider,
};
#[cfg(test)]
pub(crate) use provider::ScriptedProvider;
pub use validation::{locate_json_array, strip_markdown};
