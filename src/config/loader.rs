//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/finflow/config.toml)
//! 3. Project config (./finflow.toml)
//! 4. Explicit config file (--config)
//! 5. Environment variables (FINFLOW_* prefix, `__` between section and key)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{FinflowError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → explicit file → env vars
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(FinflowError::MissingInput {
                    path: path.to_path_buf(),
                });
            }
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // e.g. FINFLOW_LLM__ON_FAILURE -> llm.on_failure
        figment = figment.merge(Env::prefixed("FINFLOW_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| FinflowError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/finflow/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("finflow"))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from("finflow.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Print config file paths and whether they exist
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            toml::to_string_pretty(config).map_err(|e| FinflowError::Config(e.to_string()))
        }
    }

    /// Write a default global config file
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            FinflowError::Config("Cannot determine global config directory".to_string())
        })?;
        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    /// Write a default project config file (./finflow.toml)
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let config_path = Self::project_config_path();
        Self::write_default(&config_path, force)?;
        Ok(config_path)
    }

    fn write_default(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(());
        }
        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(())
    }

    fn default_config() -> String {
        r#"# finflow configuration
# Later sources override earlier ones: global, ./finflow.toml, --config, FINFLOW_* env vars.
# Env vars separate section and key with a double underscore: FINFLOW_LLM__TIMEOUT_SECS=60

version = "1.0"

[llm]
# ollama (HTTP API), ollama-cli (`ollama run`), none (pattern extraction only)
provider = "ollama"
model = "gemma3:4b"
timeout_secs = 300
temperature = 0.0
# abort | fallback
on_failure = "abort"

[extraction]
strip_markdown = true

[reconcile]
tolerance = 0.01
secondary_breakdown = true

[chart]
# standard | professional | high_contrast
color_scheme = "professional"
min_display_value = 1e-9
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorScheme, FailurePolicy};

    #[test]
    fn test_default_template_parses() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            ConfigLoader::init_project(false).map_err(|e| e.to_string())?;

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.provider, "ollama");
            assert_eq!(config.llm.on_failure, FailurePolicy::Abort);
            assert_eq!(config.chart.color_scheme, ColorScheme::Professional);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            jail.create_file(
                "custom.toml",
                "[llm]\nprovider = \"none\"\n\n[reconcile]\ntolerance = 0.05\n",
            )?;

            let config =
                ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.provider, "none");
            assert_eq!(config.reconcile.tolerance, 0.05);
            assert_eq!(config.llm.model, "gemma3:4b");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            jail.create_file("finflow.toml", "[reconcile]\ntolerance = 2.0\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_fatal() {
        let err = ConfigLoader::load(Some(Path::new("/nonexistent/finflow.toml"))).unwrap_err();
        assert!(matches!(err, FinflowError::MissingInput { .. }));
    }

    #[test]
    fn test_env_overrides_snake_case_keys() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            jail.set_env("FINFLOW_LLM__ON_FAILURE", "fallback");
            jail.set_env("FINFLOW_LLM__TIMEOUT_SECS", "7");
            jail.set_env("FINFLOW_CHART__COLOR_SCHEME", "high_contrast");
            jail.set_env("FINFLOW_RECONCILE__SECONDARY_BREAKDOWN", "false");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.on_failure, FailurePolicy::Fallback);
            assert_eq!(config.llm.timeout_secs, 7);
            assert_eq!(config.chart.color_scheme, ColorScheme::HighContrast);
            assert!(!config.reconcile.secondary_breakdown);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        figment::Jail::expect_with(|jail| {
            let dir = jail.directory().display().to_string();
            jail.set_env("XDG_CONFIG_HOME", dir);
            jail.create_file("finflow.toml", "[llm]\nmodel = \"llama3\"\nprovider = \"none\"\n")?;
            jail.set_env("FINFLOW_LLM__MODEL", "qwen2.5");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model, "qwen2.5");
            assert_eq!(config.llm.provider, "none");
            Ok(())
        });
    }

    #[test]
    fn test_render_toml() {
        let rendered = ConfigLoader::render(&Config::default(), false).unwrap();
        assert!(rendered.contains("[llm]"));
        assert!(rendered.contains("color_scheme = \"professional\""));
    }
}
