//! Extract Command
//!
//! Summary text -> reconciled bucket file.
//!
//! Usage:
//!   finflow extract -i <summary.txt> [-o buckets.json] [-m model] [--offline]

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::extract::{Analysis, analyze_summary};
use crate::types::Result;

pub async fn run(ctx: &CommandContext, input: &Path, output: Option<&Path>) -> Result<Analysis> {
    let out = Output::new();

    let analysis = analyze_summary(input, output, &ctx.config, ctx.provider.clone()).await?;

    out.extraction_source(&analysis.source);
    out.reconcile_report(&analysis.reconciliation.report);
    out.bucket_table(&analysis.reconciliation.buckets);
    out.success(&format!(
        "Buckets saved to {}",
        analysis.buckets_path.display()
    ));

    Ok(analysis)
}
