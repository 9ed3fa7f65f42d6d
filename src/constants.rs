//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Reconciliation constants
pub mod reconcile {
    /// Allowed deviation of Products + Services from Revenue, as a fraction of Revenue
    pub const DEFAULT_TOLERANCE: f64 = 0.01;
}

/// Value parsing constants
pub mod units {
    /// Multiplier for values stated in millions
    pub const MILLION: f64 = 1.0;

    /// Multiplier for values stated in billions (result is in millions)
    pub const BILLION: f64 = 1000.0;
}

/// Layout constants
pub mod layout {
    /// Horizontal stage positions, left to right
    pub const STAGES: [f64; 7] = [0.0, 0.15, 0.3, 0.45, 0.6, 0.75, 0.9];

    /// Lowest vertical offset inside a stage
    pub const Y_MIN: f64 = 0.1;

    /// Highest vertical offset inside a stage
    pub const Y_MAX: f64 = 0.9;

    /// Offset of a stage's only node
    pub const Y_CENTER: f64 = 0.5;
}

/// Chart output constants
pub mod chart {
    /// Floor applied to magnitudes so zero-valued nodes still render
    pub const MIN_DISPLAY_VALUE: f64 = 1e-9;

    /// Title used when no file stem is available
    pub const DEFAULT_TITLE: &str = "Financial Flow Analysis";

    /// Footnote shown when the chart contains derived nodes
    pub const DERIVED_FOOTNOTE: &str = "* Calculated values based on reported financials";
}

/// LLM constants
pub mod llm {
    /// Default generation model
    pub const DEFAULT_MODEL: &str = "gemma3:4b";

    /// Default Ollama HTTP endpoint
    pub const DEFAULT_API_BASE: &str = "http://localhost:11434";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
