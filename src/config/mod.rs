//! Configuration Management
//!
//! Hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/finflow/config.toml)
//! 3. Project config (./finflow.toml)
//! 4. Explicit `--config` file
//! 5. Environment variables (FINFLOW_SECTION__KEY)
//! 6. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
