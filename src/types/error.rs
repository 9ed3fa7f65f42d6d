//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//!
//! ## Error Taxonomy
//!
//! - **External-call failure**: the text-generation service failed (`Llm`, `LlmApi`)
//! - **Decode failure**: never an error here, see `extract::Unusable`
//! - **Numeric-parse failure**: never an error here, the value parser returns `None`
//! - **Missing input / I/O**: fatal (`MissingInput`, `Io`, `BucketFile`)

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories of external-call failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network/connectivity issues
    Network,
    /// Service or model not available
    Unavailable,
    /// Invalid request
    BadRequest,
    /// Temporary server issues
    Transient,
    /// Request exceeded its time bound
    Timeout,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Failure of the external text-generation call
#[derive(Debug, Clone)]
pub struct LlmError {
    pub category: ErrorCategory,
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status returned by a generation endpoint
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            400 | 422 => ErrorCategory::BadRequest,
            404 => ErrorCategory::Unavailable,
            408 | 504 => ErrorCategory::Timeout,
            429 | 500 | 502 | 503 => ErrorCategory::Transient,
            _ => ErrorCategory::Unknown,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify the stderr of a failed generation subprocess
    pub fn classify_process_failure(stderr: &str, provider: &str) -> LlmError {
        let lower = stderr.to_lowercase();

        let category = if lower.contains("not found") || lower.contains("pull") {
            ErrorCategory::Unavailable
        } else if lower.contains("connection") || lower.contains("could not connect") {
            ErrorCategory::Network
        } else if lower.contains("timeout") || lower.contains("timed out") {
            ErrorCategory::Timeout
        } else {
            ErrorCategory::Unknown
        };

        let message = if stderr.trim().is_empty() {
            "Process exited with non-zero status".to_string()
        } else {
            stderr.trim().to_string()
        };
        LlmError::with_provider(category, message, provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum FinflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structured failure of the text-generation call
    #[error("LLM error: {0}")]
    Llm(LlmError),

    /// Provider setup or transport failure without a category
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    #[error("Invalid bucket file {}: {message}", path.display())]
    BucketFile { path: PathBuf, message: String },
}

impl From<LlmError> for FinflowError {
    fn from(err: LlmError) -> Self {
        FinflowError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, FinflowError>;

impl FinflowError {
    /// Whether the error came from the external text-generation call
    pub fn is_external_call_failure(&self) -> bool {
        matches!(self, Self::Llm(_) | Self::LlmApi(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Network.to_string(), "NETWORK");
        assert_eq!(ErrorCategory::BadRequest.to_string(), "BAD_REQUEST");
    }

    #[test]
    fn test_classify_http_status() {
        let not_found = ErrorClassifier::classify_http_status(404, "model missing", "ollama");
        assert_eq!(not_found.category, ErrorCategory::Unavailable);

        let overloaded = ErrorClassifier::classify_http_status(503, "busy", "ollama");
        assert_eq!(overloaded.category, ErrorCategory::Transient);

        let odd = ErrorClassifier::classify_http_status(418, "teapot", "ollama");
        assert_eq!(odd.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_process_failure() {
        let err = ErrorClassifier::classify_process_failure(
            "Error: model 'gemma3:4b' not found, try pulling it first",
            "ollama-cli",
        );
        assert_eq!(err.category, ErrorCategory::Unavailable);

        let empty = ErrorClassifier::classify_process_failure("  ", "ollama-cli");
        assert_eq!(empty.message, "Process exited with non-zero status");
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::Network, "refused", "ollama");
        assert_eq!(err.to_string(), "[ollama:NETWORK] refused");

        let bare = LlmError::new(ErrorCategory::Unknown, "boom");
        assert_eq!(bare.to_string(), "[UNKNOWN] boom");
    }

    #[test]
    fn test_missing_input_names_the_path() {
        let err = FinflowError::MissingInput {
            path: PathBuf::from("acme_overview.txt"),
        };
        assert_eq!(err.to_string(), "Input not found: acme_overview.txt");
        assert!(!err.is_external_call_failure());
        assert!(FinflowError::from(LlmError::new(ErrorCategory::Network, "x")).is_external_call_failure());
    }
}
