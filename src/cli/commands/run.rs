//! Run Command
//!
//! `extract` followed by `visualize` on the bucket file it wrote.

use std::path::Path;

use crate::cli::commands::{extract, visualize};
use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::Result;

pub async fn run(
    ctx: &CommandContext,
    input: &Path,
    buckets_output: Option<&Path>,
    chart_output: Option<&Path>,
) -> Result<()> {
    let analysis = extract::run(ctx, input, buckets_output).await?;
    let visualization = visualize::run(&ctx.config, &analysis.buckets_path, chart_output)?;

    let out = Output::new();
    out.section("Outputs");
    println!("  Buckets: {}", analysis.buckets_path.display());
    println!("  Chart:   {}", visualization.chart_path.display());
    Ok(())
}
