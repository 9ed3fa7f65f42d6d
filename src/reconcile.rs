//! Revenue Reconciliation
//!
//! Enforces `Revenue ≈ Products + Services` within a tolerance fraction of
//! Revenue. Two steps:
//! 1. When Revenue is positive and a component is zero, ask the model for a
//!    Products/Services breakdown and fill only the zero slots.
//! 2. When both components are positive and their sum is off by more than the
//!    tolerance, scale both by `Revenue / (Products + Services)`.
//!
//! The input set is never mutated. No other taxonomy entry is adjusted.

use tracing::{debug, info, warn};

use crate::ai::SharedProvider;
use crate::config::Config;
use crate::constants::reconcile as reconcile_constants;
use crate::extract::PrimaryExtractor;
use crate::types::{BucketSet, TaxonomyKey};

/// What happened to the secondary breakdown request.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakdownOutcome {
    /// Revenue not positive, or both components already set
    NotNeeded,
    /// Needed, but no provider or the request is disabled
    Skipped,
    /// Zero slots filled from the breakdown response
    Filled(Vec<TaxonomyKey>),
    /// The response was unusable or offered nothing for the zero slots
    NoImprovement,
    /// The call failed; existing values kept
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconcileReport {
    pub breakdown: BreakdownOutcome,
    /// Scale factor applied to Products and Services, if any
    pub rescale: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub buckets: BucketSet,
    pub report: ReconcileReport,
}

pub struct Reconciler {
    breakdown: Option<PrimaryExtractor>,
    tolerance: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Reconciler {
    pub fn new(provider: Option<SharedProvider>) -> Self {
        Self {
            breakdown: provider.map(PrimaryExtractor::new),
            tolerance: reconcile_constants::DEFAULT_TOLERANCE,
        }
    }

    pub fn from_config(provider: Option<SharedProvider>, config: &Config) -> Self {
        let breakdown = provider
            .filter(|_| config.reconcile.secondary_breakdown)
            .map(|p| {
                PrimaryExtractor::new(p).with_strip_markdown(config.extraction.strip_markdown)
            });
        Self {
            breakdown,
            tolerance: config.reconcile.tolerance,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Run both steps on a copy of `input`. Never fails: a failed breakdown
    /// request leaves the zero slots in place.
    pub async fn reconcile(&self, input: &BucketSet, summary_text: &str) -> Reconciliation {
        let mut buckets = input.clone();
        let breakdown = self.fill_components(&mut buckets, summary_text).await;
        let (buckets, rescale) = self.rescale(&buckets);

        Reconciliation {
            buckets,
            report: ReconcileReport { breakdown, rescale },
        }
    }

    async fn fill_components(
        &self,
        buckets: &mut BucketSet,
        summary_text: &str,
    ) -> BreakdownOutcome {
        let revenue = buckets.value(TaxonomyKey::Revenue);
        let missing: Vec<TaxonomyKey> = [TaxonomyKey::Products, TaxonomyKey::Services]
            .into_iter()
            .filter(|key| buckets.value(*key) == 0.0)
            .collect();

        if revenue <= 0.0 || missing.is_empty() {
            return BreakdownOutcome::NotNeeded;
        }

        let Some(extractor) = &self.breakdown else {
            debug!("Revenue breakdown needed for {:?} but no provider", missing);
            return BreakdownOutcome::Skipped;
        };

        info!("Requesting Products/Services breakdown");
        let offered = match extractor.revenue_breakdown(summary_text).await {
            Ok(Ok(offered)) => offered,
            Ok(Err(reason)) => {
                warn!("Revenue breakdown unusable: {}", reason);
                return BreakdownOutcome::NoImprovement;
            }
            Err(e) => {
                warn!("Revenue breakdown request failed, keeping existing values: {}", e);
                return BreakdownOutcome::Failed(e.to_string());
            }
        };

        let mut filled = Vec::new();
        for key in missing {
            if let Some((_, value)) = offered.iter().find(|(k, _)| *k == key) {
                debug!("Breakdown filled {}: {}", key, value);
                buckets.set(key, *value);
                filled.push(key);
            }
        }

        if filled.is_empty() {
            BreakdownOutcome::NoImprovement
        } else {
            BreakdownOutcome::Filled(filled)
        }
    }

    /// Proportional rescale of Products and Services onto Revenue.
    ///
    /// Returns the scale factor when applied. A set already within tolerance
    /// comes back unchanged.
    pub fn rescale(&self, input: &BucketSet) -> (BucketSet, Option<f64>) {
        let revenue = input.value(TaxonomyKey::Revenue);
        let products = input.value(TaxonomyKey::Products);
        let services = input.value(TaxonomyKey::Services);
        let sum = products + services;

        if revenue <= 0.0 || products <= 0.0 || services <= 0.0 {
            return (input.clone(), None);
        }
        if (sum - revenue).abs() <= self.tolerance * revenue {
            return (input.clone(), None);
        }

        let scale = revenue / sum;
        warn!(
            "Products + Services ({:.2}) deviates from Revenue ({:.2}); scaling by {:.4}",
            sum, revenue, scale
        );

        let mut buckets = input.clone();
        buckets.set(TaxonomyKey::Products, products * scale);
        buckets.set(TaxonomyKey::Services, services * scale);
        (buckets, Some(scale))
    }
}
