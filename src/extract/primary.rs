//! Model-Based Extraction
//!
//! One generation call per attempt. The outer `Result` carries external-call
//! failure; the inner `Decoded` says whether the response was usable.

use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

use crate::ai::{PromptTemplates, SharedProvider, locate_json_array, strip_markdown};
use crate::types::{BucketSet, ErrorCategory, LlmError, Result, TaxonomyKey};

/// Why a model response could not be used.
#[derive(Debug, Clone, PartialEq)]
pub enum Unusable {
    /// No provider configured
    Offline,
    /// The call failed and the failure policy chose patterns over aborting
    CallFailed(String),
    /// No `[...]` span in the response
    NoJsonArray,
    /// The located span did not decode as a JSON array
    Malformed(String),
    /// An element was not a JSON object
    NotAnObject { index: usize },
    /// An element's `value` was present but not a number
    NonNumeric { index: usize },
    /// Every decoded value was exactly zero, or nothing was decoded
    AllZero,
}

impl fmt::Display for Unusable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => write!(f, "no text-generation provider configured"),
            Self::CallFailed(e) => write!(f, "model call failed: {}", e),
            Self::NoJsonArray => write!(f, "no JSON array in response"),
            Self::Malformed(e) => write!(f, "malformed JSON array: {}", e),
            Self::NotAnObject { index } => write!(f, "element {} is not an object", index),
            Self::NonNumeric { index } => write!(f, "element {} has a non-numeric value", index),
            Self::AllZero => write!(f, "every decoded value is zero"),
        }
    }
}

pub type Decoded<T> = std::result::Result<T, Unusable>;

/// One decoded `{"bucket", "value"}` element.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    /// `None` when the label is not a taxonomy label
    pub key: Option<TaxonomyKey>,
    pub value: f64,
}

/// Decode the first-`[`-to-last-`]` span of `response` into records.
///
/// A missing `value` field counts as 0.0; a non-numeric one, `null` included,
/// makes the whole response unusable.
pub fn decode_records(response: &str) -> Decoded<Vec<DecodedRecord>> {
    let span = locate_json_array(response).ok_or(Unusable::NoJsonArray)?;
    let items: Vec<Value> =
        serde_json::from_str(span).map_err(|e| Unusable::Malformed(e.to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or(Unusable::NotAnObject { index })?;
            let value = match object.get("value") {
                None => 0.0,
                Some(v) => v.as_f64().ok_or(Unusable::NonNumeric { index })?,
            };
            let key = object
                .get("bucket")
                .and_then(Value::as_str)
                .and_then(TaxonomyKey::from_label);
            Ok(DecodedRecord { key, value })
        })
        .collect()
}

/// Full validation for the taxonomy response: decodable, numeric, not all zero.
/// Unknown labels are dropped and the first occurrence of a label wins.
pub fn decode_bucket_set(response: &str) -> Decoded<BucketSet> {
    let records = decode_records(response)?;

    if records.iter().all(|r| r.value == 0.0) {
        return Err(Unusable::AllZero);
    }

    let mut buckets = BucketSet::new();
    let mut seen = HashSet::new();
    for record in records {
        let Some(key) = record.key else { continue };
        if key.is_derivable() || !seen.insert(key) {
            continue;
        }
        buckets.set(key, record.value);
    }

    Ok(buckets)
}

pub struct PrimaryExtractor {
    provider: SharedProvider,
    strip_markdown: bool,
}

impl PrimaryExtractor {
    pub fn new(provider: SharedProvider) -> Self {
        Self {
            provider,
            strip_markdown: true,
        }
    }

    pub fn with_strip_markdown(mut self, enabled: bool) -> Self {
        self.strip_markdown = enabled;
        self
    }

    async fn ask(&self, prompt: &str) -> Result<String> {
        let raw = self.provider.generate(prompt).await?;
        let response = if self.strip_markdown {
            strip_markdown(&raw)
        } else {
            raw
        };
        debug!("Model raw response:\n{}", response);
        Ok(response)
    }

    /// Provider health check, run before the extraction call. An unhealthy
    /// provider is reported as an `Unavailable` call failure.
    pub async fn preflight(&self) -> Result<()> {
        if self.provider.health_check().await? {
            debug!("Provider '{}' is healthy", self.provider.name());
            return Ok(());
        }
        Err(LlmError::with_provider(
            ErrorCategory::Unavailable,
            format!("model '{}' is not available", self.provider.model()),
            self.provider.name(),
        )
        .into())
    }

    /// Ask for the full taxonomy in a single call.
    pub async fn extract(&self, summary_text: &str) -> Result<Decoded<BucketSet>> {
        let response = self
            .ask(&PromptTemplates::taxonomy_extraction(summary_text))
            .await?;

        let decoded = decode_bucket_set(&response);
        match &decoded {
            Ok(_) => info!(
                "Decoded taxonomy from {} ({})",
                self.provider.name(),
                self.provider.model()
            ),
            Err(reason) => warn!("Model response unusable: {}", reason),
        }
        Ok(decoded)
    }

    /// Ask for Products/Services only. Returns the positive values offered.
    pub async fn revenue_breakdown(
        &self,
        summary_text: &str,
    ) -> Result<Decoded<Vec<(TaxonomyKey, f64)>>> {
        let response = self
            .ask(&PromptTemplates::revenue_breakdown(summary_text))
            .await?;

        Ok(decode_records(&response).map(|records| {
            records
                .into_iter()
                .filter_map(|r| match r.key {
                    Some(key @ (TaxonomyKey::Products | TaxonomyKey::Services)) if r.value > 0.0 => {
                        Some((key, r.value))
                    }
                    _ => None,
                })
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedProvider;

    #[test]
    fn test_decode_bucket_set_maps_labels() {
        let response = r#"Sure! [{"bucket":"Revenue","value":1000},
            {"bucket":"Net Income","value":93.5},
            {"bucket":"Free Cash Flow","value":7},
            {"bucket":"Revenue","value":5}] Done."#;

        let set = decode_bucket_set(response).unwrap();
        assert_eq!(set.value(TaxonomyKey::Revenue), 1000.0);
        assert_eq!(set.value(TaxonomyKey::NetIncome), 93.5);
        assert_eq!(set.value(TaxonomyKey::Products), 0.0);
        assert_eq!(set.iter().count(), TaxonomyKey::EXTRACTED.len());
    }

    #[test]
    fn test_decode_unusable_reasons() {
        assert_eq!(decode_bucket_set("I cannot help"), Err(Unusable::NoJsonArray));
        assert!(matches!(
            decode_bucket_set("[{\"bucket\": \"Revenue\", value: 1}]"),
            Err(Unusable::Malformed(_))
        ));
        assert_eq!(
            decode_bucket_set(r#"[{"bucket":"Revenue","value":"1,000"}]"#),
            Err(Unusable::NonNumeric { index: 0 })
        );
        assert_eq!(
            decode_bucket_set(r#"[{"bucket":"Revenue","value":1}, 5]"#),
            Err(Unusable::NotAnObject { index: 1 })
        );
        assert_eq!(
            decode_bucket_set(r#"[{"bucket":"Revenue","value":1000},{"bucket":"Taxes","value":null}]"#),
            Err(Unusable::NonNumeric { index: 1 })
        );
        assert_eq!(
            decode_bucket_set(r#"[{"bucket":"Revenue","value":0.0},{"bucket":"Taxes"}]"#),
            Err(Unusable::AllZero)
        );
        assert_eq!(decode_bucket_set("[]"), Err(Unusable::AllZero));
    }

    #[tokio::test]
    async fn test_preflight_reports_unavailable_provider() {
        let healthy = PrimaryExtractor::new(ScriptedProvider::new(vec![]));
        assert!(healthy.preflight().await.is_ok());

        let provider = ScriptedProvider::unavailable();
        let err = PrimaryExtractor::new(provider.clone())
            .preflight()
            .await
            .unwrap_err();
        assert!(err.is_external_call_failure());
        assert!(err.to_string().contains("test-model"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_extract_strips_markdown_before_decoding() {
        let provider = ScriptedProvider::new(vec![Ok(
            "```json\n[{\"bucket\":\"**Revenue**\",\"value\":12.5}]\n```",
        )]);
        let extractor = PrimaryExtractor::new(provider.clone());

        let set = extractor.extract("summary").await.unwrap().unwrap();
        assert_eq!(set.value(TaxonomyKey::Revenue), 12.5);
        assert_eq!(provider.calls(), 1);
        assert!(provider.prompt(0).contains("summary"));
    }

    #[tokio::test]
    async fn test_extract_surfaces_call_failure() {
        let provider = ScriptedProvider::new(vec![Err("connection refused")]);
        let extractor = PrimaryExtractor::new(provider);

        let err = extractor.extract("summary").await.unwrap_err();
        assert!(err.is_external_call_failure());
    }

    #[tokio::test]
    async fn test_revenue_breakdown_keeps_positive_components() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"[{"bucket":"Products","value":0.0},{"bucket":"Services","value":250},{"bucket":"Revenue","value":900}]"#,
        )]);
        let extractor = PrimaryExtractor::new(provider);

        let offered = extractor.revenue_breakdown("summary").await.unwrap().unwrap();
        assert_eq!(offered, vec![(TaxonomyKey::Services, 250.0)]);
    }
}
