//! Ollama CLI Provider
//!
//! Runs `ollama run <model>` with the prompt on stdin and returns stdout.
//! Single-shot execution only.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{LlmProvider, ProviderConfig};
use crate::types::{ErrorCategory, ErrorClassifier, FinflowError, LlmError, Result};

const PROVIDER_NAME: &str = "ollama-cli";

pub struct OllamaCliProvider {
    program: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaCliProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            program: "ollama".to_string(),
            model: config.model,
            timeout_secs: config.timeout_secs,
        }
    }

    /// Override the executable (tests, non-standard installs).
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn execute(&self, prompt: &str) -> Result<String> {
        let start_time = Instant::now();

        let mut child = Command::new(&self.program)
            .arg("run")
            .arg(&self.model)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                LlmError::with_provider(
                    ErrorCategory::Unavailable,
                    format!("Failed to spawn {}: {}. Is it installed?", self.program, e),
                    PROVIDER_NAME,
                )
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(prompt.as_bytes()).await.map_err(|e| {
                FinflowError::LlmApi(format!("Failed to write prompt to ollama run: {}", e))
            })?;
            // Dropping stdin closes the pipe so the model starts generating
        }

        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| {
            LlmError::with_provider(
                ErrorCategory::Timeout,
                format!("ollama run timed out after {}s", self.timeout_secs),
                PROVIDER_NAME,
            )
        })?
        .map_err(|e| FinflowError::LlmApi(format!("ollama run failed: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ErrorClassifier::classify_process_failure(&stderr, PROVIDER_NAME).into());
        }

        debug!(
            "ollama run finished in {}ms",
            start_time.elapsed().as_millis()
        );

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl LlmProvider for OllamaCliProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!("Generating with ollama run (model: {})", self.model);
        self.execute(prompt).await
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let status = Command::new(&self.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;
        Ok(status.is_ok_and(|s| s.success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_external_failure() {
        let provider = OllamaCliProvider::new(ProviderConfig::default())
            .with_program("finflow-test-no-such-binary");

        let err = provider.generate("prompt").await.unwrap_err();
        assert!(err.is_external_call_failure());
        match err {
            FinflowError::Llm(e) => assert_eq!(e.category, ErrorCategory::Unavailable),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!provider.health_check().await.unwrap());
    }
}
