//! Visualize Command
//!
//! Bucket file -> flow graph -> layout -> chart description file.
//!
//! Usage:
//!   finflow visualize -j <buckets.json> [-o chart.json] [-c professional]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::Config;
use crate::flow::{Visualization, visualize_buckets};
use crate::types::Result;

pub fn run(config: &Config, buckets: &Path, output: Option<&Path>) -> Result<Visualization> {
    let out = Output::new();

    let result = visualize_buckets(buckets, output, &config.chart)?;

    if result.layout.nodes.is_empty() {
        out.warning("No non-zero buckets; the chart is empty");
    }
    if let Some(footnote) = &result.chart.footnote {
        out.info(footnote);
    }
    out.success(&format!(
        "{}: {} nodes, {} links, {} colors",
        result.chart.title,
        result.chart.nodes.len(),
        result.chart.links.len(),
        config.chart.color_scheme
    ));
    out.success(&format!("Chart saved to {}", result.chart_path.display()));

    Ok(result)
}
