//! Config Command
//!
//! Inspect and initialize finflow configuration.
//!
//! Usage:
//!   finflow config show [-f toml|json]
//!   finflow config path
//!   finflow config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{FinflowError, Result};

/// Show the merged effective configuration
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" | "text" => false,
        other => {
            return Err(FinflowError::Config(format!(
                "Unknown format: {}. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load(config_path)?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file, global or `./finflow.toml`
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };
    Output::new().success(&format!("Configuration at {}", path.display()));
    Ok(())
}
