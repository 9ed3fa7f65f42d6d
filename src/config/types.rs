//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{
    chart as chart_constants, llm as llm_constants, network as net_constants,
    reconcile as reconcile_constants,
};
use crate::types::{FinflowError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Text-generation provider settings
    pub llm: LlmConfig,

    /// Extraction settings
    pub extraction: ExtractionConfig,

    /// Revenue reconciliation settings
    pub reconcile: ReconcileConfig,

    /// Chart output settings
    pub chart: ChartConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            extraction: ExtractionConfig::default(),
            reconcile: ReconcileConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(FinflowError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(FinflowError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        let tolerance = self.reconcile.tolerance;
        if !(tolerance > 0.0 && tolerance < 1.0) {
            return Err(FinflowError::Config(format!(
                "Reconcile tolerance must be in (0, 1), got {}",
                tolerance
            )));
        }

        let floor = self.chart.min_display_value;
        if floor.is_nan() || floor < 0.0 {
            return Err(FinflowError::Config(
                "Chart min_display_value must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

/// What to do when the primary extraction call itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Surface the provider error and stop
    #[default]
    Abort,
    /// Log the error and use the pattern table
    Fallback,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "fallback" => Ok(Self::Fallback),
            _ => Err(format!(
                "Unknown failure policy: {}. Valid values: abort, fallback",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: ollama, ollama-cli, none
    pub provider: String,

    /// Model name
    pub model: String,

    /// API base URL for HTTP providers
    pub api_base: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// 0.0 keeps extraction deterministic
    pub temperature: f32,

    /// Behaviour when the primary extraction call fails
    pub on_failure: FailurePolicy,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: llm_constants::DEFAULT_MODEL.to_string(),
            api_base: None,
            timeout_secs: net_constants::DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            on_failure: FailurePolicy::Abort,
        }
    }
}

// =============================================================================
// Extraction Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Strip markdown emphasis from model output before decoding
    pub strip_markdown: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_markdown: true,
        }
    }
}

// =============================================================================
// Reconcile Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Allowed |Products + Services - Revenue| as a fraction of Revenue
    pub tolerance: f64,

    /// Ask the model for a Products/Services split when one is missing
    pub secondary_breakdown: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            tolerance: reconcile_constants::DEFAULT_TOLERANCE,
            secondary_breakdown: true,
        }
    }
}

// =============================================================================
// Chart Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Standard,
    #[default]
    Professional,
    HighContrast,
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Professional => write!(f, "professional"),
            Self::HighContrast => write!(f, "high_contrast"),
        }
    }
}

impl std::str::FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(Self::Standard),
            "professional" => Ok(Self::Professional),
            "high_contrast" => Ok(Self::HighContrast),
            _ => Err(format!(
                "Unknown color scheme: {}. Valid values: standard, professional, high_contrast",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub color_scheme: ColorScheme,

    /// Floor for link and node magnitudes
    pub min_display_value: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Professional,
            min_display_value: chart_constants::MIN_DISPLAY_VALUE,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
