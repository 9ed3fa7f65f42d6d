//! Flow Graph and Layout
//!
//! bucket set -> `FlowGraphBuilder` (derive, nodes, edges) -> `LayoutEngine`
//! (stages, offsets, color classes) -> `SankeyChart` (renderer input).

mod chart;
mod graph;
mod layout;
mod palette;

pub use chart::{
    ChartLink, ChartNode, SankeyChart, chart_title, default_chart_path, node_label,
};
pub use graph::{FlowGraph, FlowGraphBuilder, GraphEdge, GraphNode, NodeSet};
pub use layout::{ColorClass, FlowEdge, FlowLayout, FlowNode, LayoutEngine};
pub use palette::Palette;

use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ChartConfig;
use crate::storage::read_bucket_file;
use crate::types::{BucketSet, Result};

/// Outcome of one bucket file -> chart file run.
#[derive(Debug, Clone)]
pub struct Visualization {
    pub chart_path: PathBuf,
    pub chart: SankeyChart,
    pub layout: FlowLayout,
}

/// Build the chart for an in-memory set.
pub fn build_chart(
    buckets: &BucketSet,
    title: String,
    config: &ChartConfig,
) -> (FlowLayout, SankeyChart) {
    let graph = FlowGraphBuilder::new(config.min_display_value).build(buckets);
    let layout = LayoutEngine::layout(&graph);
    let chart = SankeyChart::from_layout(&layout, title, &Palette::new(config.color_scheme));
    (layout, chart)
}

/// Read a bucket file and write its chart description.
///
/// The chart goes to `output`, or `<bucket stem>_sankey.json` next to the
/// bucket file.
pub fn visualize_buckets(
    buckets_path: &Path,
    output: Option<&Path>,
    config: &ChartConfig,
) -> Result<Visualization> {
    let buckets = read_bucket_file(buckets_path)?;
    let (layout, chart) = build_chart(&buckets, chart_title(Some(buckets_path)), config);

    let chart_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_chart_path(buckets_path));
    chart.write(&chart_path)?;
    info!(
        "Chart with {} nodes and {} links saved to {}",
        chart.nodes.len(),
        chart.links.len(),
        chart_path.display()
    );

    Ok(Visualization {
        chart_path,
        chart,
        layout,
    })
}
