//! CLI Common Utilities
//!
//! Shared initialization for command handlers: configuration resolution,
//! CLI overrides, and provider construction.

use std::path::Path;

use tracing::debug;

use crate::ai::{SharedProvider, create_provider};
use crate::config::{ColorScheme, Config, ConfigLoader, FailurePolicy};
use crate::types::Result;

/// Command-line values that override the resolved configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub offline: bool,
    pub on_failure: Option<FailurePolicy>,
    pub color_scheme: Option<ColorScheme>,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if self.offline {
            config.llm.provider = "none".to_string();
        }
        if let Some(policy) = self.on_failure {
            config.llm.on_failure = policy;
        }
        if let Some(scheme) = self.color_scheme {
            config.chart.color_scheme = scheme;
        }
    }
}

/// Command execution context
pub struct CommandContext {
    /// Effective configuration after overrides
    pub config: Config,
    /// `None` in offline mode
    pub provider: Option<SharedProvider>,
}

impl CommandContext {
    /// Resolve config, apply overrides, and build the provider.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = ConfigLoader::load(config_path)?;
        overrides.apply(&mut config);
        config.validate()?;

        let provider = create_provider(&config.llm)?;
        match &provider {
            Some(p) => debug!("Using provider {} ({})", p.name(), p.model()),
            None => debug!("Offline: pattern extraction only"),
        }

        Ok(Self { config, provider })
    }
}
