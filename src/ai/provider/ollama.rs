//! Ollama Local LLM Provider
//!
//! Non-streaming calls to a locally running Ollama HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{LlmProvider, ProviderConfig};
use crate::constants::{llm as llm_constants, network as net_constants};
use crate::types::{ErrorCategory, ErrorClassifier, FinflowError, LlmError, Result};

const PROVIDER_NAME: &str = "ollama";

/// Ollama Local LLM Provider
pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| llm_constants::DEFAULT_API_BASE.to_string());

        // Validate endpoint URL for security (SSRF prevention)
        let api_base = Self::validate_endpoint(&api_base)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(net_constants::CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| FinflowError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model: config.model,
            temperature: config.temperature,
            client,
        })
    }

    /// Only allows http/https schemes and warns for non-localhost endpoints.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            FinflowError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(FinflowError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    /// `gemma3:4b` matches itself; `llama3` and `llama3:latest` match any `llama3*` tag.
    fn lists_model(&self, tags: &OllamaTagsResponse) -> bool {
        let base = self.model.replace(":latest", "");
        tags.models
            .iter()
            .any(|m| m.name == self.model || m.name.starts_with(&base))
    }

    fn build_request(&self, prompt: &str) -> OllamaRequest {
        OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: Some(OllamaOptions {
                temperature: self.temperature,
            }),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!(
            "Generating with Ollama (model: {}, temperature: {})",
            self.model, self.temperature
        );

        let start_time = Instant::now();
        let url = format!("{}/api/generate", self.api_base);

        let response = self
            .client
            .post(&url)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                let category = if e.is_connect() {
                    ErrorCategory::Network
                } else if e.is_timeout() {
                    ErrorCategory::Timeout
                } else {
                    ErrorCategory::Unknown
                };
                LlmError::with_provider(
                    category,
                    format!("Ollama request to {} failed: {}", self.api_base, e),
                    PROVIDER_NAME,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ErrorClassifier::classify_http_status(
                status.as_u16(),
                &format!("Ollama API error ({}): {}", status, body),
                PROVIDER_NAME,
            )
            .into());
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| FinflowError::LlmApi(format!("Failed to read Ollama response: {}", e)))?;

        debug!(
            "Ollama responded in {}ms ({} output tokens)",
            start_time.elapsed().as_millis(),
            body.eval_count.unwrap_or(0)
        );

        Ok(body.response.trim().to_string())
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.api_base);

        match self.client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let Ok(tags) = resp.json::<OllamaTagsResponse>().await else {
                    info!("Ollama is available");
                    return Ok(true);
                };
                let model_available = self.lists_model(&tags);

                if !model_available {
                    warn!(
                        "Ollama is running but model '{}' not found. Pull with: ollama pull {}",
                        self.model, self.model
                    );
                }
                Ok(model_available)
            }
            Ok(resp) => {
                warn!("Ollama API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama not available: {}. Start with: ollama serve", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let provider = OllamaProvider::new(ProviderConfig::default()).expect("provider");
        assert_eq!(provider.api_base, llm_constants::DEFAULT_API_BASE);
        assert_eq!(provider.model, llm_constants::DEFAULT_MODEL);
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let config = ProviderConfig {
            api_base: Some("file:///etc/passwd".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            OllamaProvider::new(config),
            Err(FinflowError::Config(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ProviderConfig {
            api_base: Some("http://127.0.0.1:11434/".to_string()),
            ..Default::default()
        };
        let provider = OllamaProvider::new(config).unwrap();
        assert_eq!(provider.api_base, "http://127.0.0.1:11434");
    }

    #[test]
    fn test_lists_model_from_tags() {
        let tags: OllamaTagsResponse = serde_json::from_str(
            r#"{"models":[{"name":"gemma3:4b"},{"name":"llama3:8b-instruct"}]}"#,
        )
        .unwrap();

        let model = |name: &str| {
            OllamaProvider::new(ProviderConfig {
                model: name.to_string(),
                ..Default::default()
            })
            .unwrap()
        };
        assert!(model("gemma3:4b").lists_model(&tags));
        assert!(model("llama3:latest").lists_model(&tags));
        assert!(!model("qwen2.5:7b").lists_model(&tags));
    }

    #[tokio::test]
    async fn test_health_check_unreachable_server() {
        let config = ProviderConfig {
            api_base: Some("http://127.0.0.1:9".to_string()),
            ..Default::default()
        };
        let provider = OllamaProvider::new(config).unwrap();
        assert!(!provider.health_check().await.unwrap());
    }

    #[test]
    fn test_request_is_non_streaming() {
        let provider = OllamaProvider::new(ProviderConfig::default()).unwrap();
        let body = serde_json::to_value(provider.build_request("hello")).unwrap();
        assert_eq!(body["stream"], false);
        assert_eq!(body["prompt"], "hello");
        assert_eq!(body["options"]["temperature"], 0.0);
    }
}
