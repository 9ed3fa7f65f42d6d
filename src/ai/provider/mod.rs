//! Text-Generation Provider Abstraction
//!
//! The pipeline treats the model as `generate(prompt) -> String | Error`.
//! Providers perform single-shot calls; retry policy belongs to the caller.

mod ollama;
mod ollama_cli;
#[cfg(test)]
mod scripted;

pub use ollama::OllamaProvider;
pub use ollama_cli::OllamaCliProvider;
#[cfg(test)]
pub(crate) use scripted::ScriptedProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::constants::{llm as llm_constants, network as net_constants};
use crate::types::{FinflowError, Result};

/// Shared provider handle passed to extraction and reconciliation.
pub type SharedProvider = Arc<dyn LlmProvider>;

// =============================================================================
// Provider Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type: "ollama", "ollama-cli"
    pub provider: String,
    pub model: String,
    pub timeout_secs: u64,
    /// 0.0 keeps extraction deterministic
    pub temperature: f32,
    /// API base URL (HTTP providers only)
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: llm_constants::DEFAULT_MODEL.to_string(),
            timeout_secs: net_constants::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            api_base: None,
        }
    }
}

impl From<&LlmConfig> for ProviderConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
            api_base: config.api_base.clone(),
        }
    }
}

// =============================================================================
// Provider Trait
// =============================================================================

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw response text.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;
}

/// Create a provider from configuration. `"none"` means offline.
pub fn create_provider(config: &LlmConfig) -> Result<Option<SharedProvider>> {
    let provider_config = ProviderConfig::from(config);

    match config.provider.as_str() {
        "none" | "offline" => Ok(None),
        "ollama" => Ok(Some(Arc::new(OllamaProvider::new(provider_config)?))),
        "ollama-cli" => Ok(Some(Arc::new(OllamaCliProvider::new(provider_config)))),
        other => Err(FinflowError::Config(format!(
            "Unknown provider: {}. Supported: ollama, ollama-cli, none",
            other
        ))),
    }
}
