//! Extraction
//!
//! Recovers the taxonomy from a summary text:
//! - `value`: numeric literal + unit normalization (millions)
//! - `primary`: one model call, decoded into a `BucketSet` or an `Unusable` reason
//! - `fallback`: ordered label-synonym patterns, no external calls
//!
//! `ExtractionPipeline` picks between them; `analyze_summary` runs the whole
//! summary -> bucket file step including reconciliation.

mod fallback;
mod primary;
mod value;

pub use fallback::{FallbackExtractor, LabelPatterns};
pub use primary::{
    Decoded, DecodedRecord, PrimaryExtractor, Unusable, decode_bucket_set, decode_records,
};
pub use value::{parse_millions, unit_multiplier};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::ai::SharedProvider;
use crate::config::{Config, FailurePolicy};
use crate::reconcile::{Reconciler, Reconciliation};
use crate::storage::{default_buckets_path, write_bucket_file};
use crate::types::{BucketSet, FinflowError, Result};

/// Where an extracted set came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionSource {
    Model,
    Patterns { reason: Unusable },
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub buckets: BucketSet,
    pub source: ExtractionSource,
}

/// Model first, pattern table when the model result is unusable.
pub struct ExtractionPipeline {
    primary: Option<PrimaryExtractor>,
    fallback: FallbackExtractor,
    on_failure: FailurePolicy,
}

impl ExtractionPipeline {
    pub fn new(provider: Option<SharedProvider>) -> Self {
        Self {
            primary: provider.map(PrimaryExtractor::new),
            fallback: FallbackExtractor::new(),
            on_failure: FailurePolicy::default(),
        }
    }

    pub fn from_config(provider: Option<SharedProvider>, config: &Config) -> Self {
        Self {
            primary: provider.map(|p| {
                PrimaryExtractor::new(p).with_strip_markdown(config.extraction.strip_markdown)
            }),
            fallback: FallbackExtractor::new(),
            on_failure: config.llm.on_failure,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackExtractor) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_failure = policy;
        self
    }

    /// Extract a fully populated set.
    ///
    /// Only an external-call failure (including a failed health check) under
    /// `FailurePolicy::Abort` is an error; every decode problem ends in the
    /// pattern table.
    pub async fn extract(&self, text: &str) -> Result<Extraction> {
        let decoded = match &self.primary {
            None => Err(Unusable::Offline),
            Some(primary) => match Self::ask_model(primary, text).await {
                Ok(decoded) => decoded,
                Err(e)
                    if e.is_external_call_failure()
                        && self.on_failure == FailurePolicy::Fallback =>
                {
                    warn!("Model unavailable, continuing with patterns: {}", e);
                    Err(Unusable::CallFailed(e.to_string()))
                }
                Err(e) => return Err(e),
            },
        };

        match decoded {
            Ok(buckets) => Ok(Extraction {
                buckets,
                source: ExtractionSource::Model,
            }),
            Err(reason) => {
                if reason != Unusable::Offline {
                    warn!("Falling back to pattern extraction: {}", reason);
                }
                Ok(Extraction {
                    buckets: self.fallback.extract(text),
                    source: ExtractionSource::Patterns { reason },
                })
            }
        }
    }

    async fn ask_model(primary: &PrimaryExtractor, text: &str) -> Result<Decoded<BucketSet>> {
        primary.preflight().await?;
        primary.extract(text).await
    }
}

/// Result of turning one summary into a bucket file.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub buckets_path: PathBuf,
    pub source: ExtractionSource,
    pub reconciliation: Reconciliation,
}

/// Read `summary`, extract, reconcile, and write the bucket file.
///
/// The bucket file goes to `output`, or `<summary stem>_buckets.json` next to
/// the summary.
pub async fn analyze_summary(
    summary: &Path,
    output: Option<&Path>,
    config: &Config,
    provider: Option<SharedProvider>,
) -> Result<Analysis> {
    if !summary.exists() {
        return Err(FinflowError::MissingInput {
            path: summary.to_path_buf(),
        });
    }
    let text = fs::read_to_string(summary)?;
    info!("Analyzing {} ({} chars)", summary.display(), text.len());

    let pipeline = ExtractionPipeline::from_config(provider.clone(), config);
    let extraction = pipeline.extract(&text).await?;

    let reconciler = Reconciler::from_config(provider, config);
    let reconciliation = reconciler.reconcile(&extraction.buckets, &text).await;

    let buckets_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_buckets_path(summary));
    write_bucket_file(&buckets_path, &reconciliation.buckets)?;
    info!("Buckets saved to {}", buckets_path.display());

    Ok(Analysis {
        buckets_path,
        source: extraction.source,
        reconciliation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ScriptedProvider;
    use crate::reconcile::BreakdownOutcome;
    use crate::storage::read_bucket_file;
    use crate::types::TaxonomyKey;
    use tempfile::TempDir;

    const MODEL_REPLY: &str = r#"[{"bucket":"Revenue","value":1000},{"bucket":"Products","value":600},{"bucket":"Services","value":400},{"bucket":"Net Income","value":120}]"#;

    #[tokio::test]
    async fn test_model_result_used_when_usable() {
        let provider = ScriptedProvider::new(vec![Ok(MODEL_REPLY)]);
        let pipeline = ExtractionPipeline::new(Some(provider as SharedProvider));

        let extraction = pipeline.extract("Revenue was $5 million").await.unwrap();
        assert_eq!(extraction.source, ExtractionSource::Model);
        assert_eq!(extraction.buckets.value(TaxonomyKey::Revenue), 1000.0);
    }

    #[tokio::test]
    async fn test_unusable_reply_falls_back_to_patterns() {
        let provider =
            ScriptedProvider::new(vec![Ok("[{\"bucket\":\"Revenue\",\"value\":0}]")]);
        let pipeline = ExtractionPipeline::new(Some(provider as SharedProvider));

        let extraction = pipeline.extract("Revenue was $5 million").await.unwrap();
        assert_eq!(
            extraction.source,
            ExtractionSource::Patterns {
                reason: Unusable::AllZero
            }
        );
        assert_eq!(extraction.buckets.value(TaxonomyKey::Revenue), 5.0);
    }

    #[tokio::test]
    async fn test_call_failure_respects_policy() {
        let provider = ScriptedProvider::new(vec![Err("connection refused")]);
        let err = ExtractionPipeline::new(Some(provider as SharedProvider))
            .extract("Revenue was $5 million")
            .await
            .unwrap_err();
        assert!(err.is_external_call_failure());

        let provider = ScriptedProvider::new(vec![Err("connection refused")]);
        let extraction = ExtractionPipeline::new(Some(provider as SharedProvider))
            .with_failure_policy(FailurePolicy::Fallback)
            .extract("Revenue was $5 million")
            .await
            .unwrap();
        assert!(matches!(
            extraction.source,
            ExtractionSource::Patterns {
                reason: Unusable::CallFailed(_)
            }
        ));
        assert_eq!(extraction.buckets.value(TaxonomyKey::Revenue), 5.0);
    }

    #[tokio::test]
    async fn test_unhealthy_provider_checked_before_call() {
        let provider = ScriptedProvider::unavailable();
        let err = ExtractionPipeline::new(Some(provider.clone() as SharedProvider))
            .extract("Revenue was $5 million")
            .await
            .unwrap_err();
        assert!(err.is_external_call_failure());
        assert_eq!(provider.calls(), 0);

        let provider = ScriptedProvider::unavailable();
        let extraction = ExtractionPipeline::new(Some(provider.clone() as SharedProvider))
            .with_failure_policy(FailurePolicy::Fallback)
            .extract("Revenue was $5 million")
            .await
            .unwrap();
        assert!(matches!(
            extraction.source,
            ExtractionSource::Patterns {
                reason: Unusable::CallFailed(_)
            }
        ));
        assert_eq!(extraction.buckets.value(TaxonomyKey::Revenue), 5.0);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_offline_components_stay_zero() {
        let dir = TempDir::new().unwrap();
        let summary = dir.path().join("acme_summary.txt");
        fs::write(
            &summary,
            r#"[{"bucket":"Revenue","value":1000},{"bucket":"Products","value":0},{"bucket":"Services","value":0}]"#,
        )
        .unwrap();

        let analysis = analyze_summary(&summary, None, &Config::default(), None)
            .await
            .unwrap();

        assert_eq!(analysis.buckets_path, dir.path().join("acme_summary_buckets.json"));
        assert_eq!(
            analysis.source,
            ExtractionSource::Patterns {
                reason: Unusable::Offline
            }
        );
        assert_eq!(analysis.reconciliation.report.breakdown, BreakdownOutcome::Skipped);
        assert_eq!(analysis.reconciliation.report.rescale, None);

        let written = read_bucket_file(&analysis.buckets_path).unwrap();
        assert_eq!(written.value(TaxonomyKey::Revenue), 1000.0);
        assert_eq!(written.value(TaxonomyKey::Products), 0.0);
        assert_eq!(written.value(TaxonomyKey::Services), 0.0);
    }

    #[tokio::test]
    async fn test_missing_summary_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = analyze_summary(&dir.path().join("absent.txt"), None, &Config::default(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, FinflowError::MissingInput { .. }));
    }
}
