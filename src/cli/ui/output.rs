use console::style;

use crate::extract::ExtractionSource;
use crate::reconcile::{BreakdownOutcome, ReconcileReport};
use crate::types::{BucketSet, TaxonomyKey};

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// One `Label: $value M` line per extracted bucket.
    pub fn bucket_table(&self, buckets: &BucketSet) {
        self.section("Financial Buckets (millions)");
        for key in TaxonomyKey::EXTRACTED {
            let value = buckets.value(key);
            let line = format!("{}: ${:.2}M", key.label(), value);
            if value == 0.0 {
                println!("  {}", style(line).dim());
            } else {
                println!("  {}", line);
            }
        }
    }

    pub fn extraction_source(&self, source: &ExtractionSource) {
        match source {
            ExtractionSource::Model => self.info("Values extracted by the model"),
            ExtractionSource::Patterns { reason } => {
                self.warning(&format!("Values extracted by pattern table ({})", reason))
            }
        }
    }

    pub fn reconcile_report(&self, report: &ReconcileReport) {
        match &report.breakdown {
            BreakdownOutcome::NotNeeded => {}
            BreakdownOutcome::Skipped => {
                self.info("Products/Services breakdown skipped (no model available)")
            }
            BreakdownOutcome::Filled(keys) => {
                let names: Vec<&str> = keys.iter().map(|k| k.label()).collect();
                self.info(&format!("Breakdown filled: {}", names.join(", ")))
            }
            BreakdownOutcome::NoImprovement => {
                self.warning("Breakdown request returned nothing usable")
            }
            BreakdownOutcome::Failed(e) => self.warning(&format!("Breakdown request failed: {}", e)),
        }

        if let Some(scale) = report.rescale {
            self.warning(&format!(
                "Products and Services rescaled by {:.4} to match Revenue",
                scale
            ));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
