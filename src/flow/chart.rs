//! Sankey Chart Description
//!
//! Plain data handed to an external renderer: labelled, positioned, colored
//! nodes and index-based links. Serialized as JSON next to the bucket file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::layout::{ColorClass, FlowLayout, FlowNode};
use super::palette::Palette;
use crate::constants::chart as chart_constants;
use crate::storage::bucket_file::sibling_with_suffix;
use crate::types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartNode {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub color_class: ColorClass,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub color_class: ColorClass,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyChart {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote: Option<String>,
    pub nodes: Vec<ChartNode>,
    pub links: Vec<ChartLink>,
}

/// `"Net Income<br>$+93.7M"`, with `*` after derived labels.
pub fn node_label(node: &FlowNode) -> String {
    let marker = if node.is_derived { "*" } else { "" };
    let sign = if node.value >= 0.0 { "+" } else { "-" };
    format!(
        "{}{}<br>${}{:.1}M",
        node.label,
        marker,
        sign,
        node.value.abs()
    )
}

/// `"Acme - Financial Flow Analysis"` from `acme_buckets.json`.
pub fn chart_title(source: Option<&Path>) -> String {
    let base = source
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('_').next())
        .unwrap_or("");

    let mut chars = base.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{} - {}",
            first.to_uppercase(),
            chars.as_str().to_lowercase(),
            chart_constants::DEFAULT_TITLE
        ),
        None => chart_constants::DEFAULT_TITLE.to_string(),
    }
}

/// `<dir>/<bucket stem>_sankey.json`
pub fn default_chart_path(buckets: &Path) -> PathBuf {
    sibling_with_suffix(buckets, "_sankey.json")
}

impl SankeyChart {
    pub fn from_layout(layout: &FlowLayout, title: String, palette: &Palette) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| ChartNode {
                label: node_label(node),
                x: node.stage,
                y: node.y_position,
                color_class: node.color_class,
                color: palette.color(node.color_class).to_string(),
            })
            .collect();

        let links = layout
            .edges
            .iter()
            .filter_map(|edge| {
                Some(ChartLink {
                    source: layout.index_of(edge.source)?,
                    target: layout.index_of(edge.target)?,
                    value: edge.magnitude,
                    color_class: edge.color_class,
                    color: palette.color(edge.color_class).to_string(),
                })
            })
            .collect();

        let footnote = layout
            .nodes
            .iter()
            .any(|n| n.is_derived)
            .then(|| chart_constants::DERIVED_FOOTNOTE.to_string());

        Self {
            title,
            footnote,
            nodes,
            links,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(
            "Wrote chart with {} nodes and {} links to {}",
            self.nodes.len(),
            self.links.len(),
            path.display()
        );
        Ok(())
    }
}
