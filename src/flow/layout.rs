//! Stage Layout and Color Classes
//!
//! Each node gets a fixed horizontal stage by taxonomy role and an evenly
//! spaced vertical offset inside its stage. Colors are semantic classes; the
//! palette maps them to concrete values later.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::graph::FlowGraph;
use crate::constants::layout as layout_constants;
use crate::types::TaxonomyKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorClass {
    Revenue,
    Expense,
    Profit,
    Positive,
    Negative,
    Tax,
    Neutral,
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
            Self::Profit => "profit",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Tax => "tax",
            Self::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: TaxonomyKey,
    pub label: String,
    pub value: f64,
    pub stage: f64,
    pub y_position: f64,
    pub color_class: ColorClass,
    pub is_derived: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub source: TaxonomyKey,
    pub target: TaxonomyKey,
    pub magnitude: f64,
    pub color_class: ColorClass,
}

/// Positioned, colored graph. Nodes are in taxonomy order.
#[derive(Debug, Clone, Default)]
pub struct FlowLayout {
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowLayout {
    /// Position of `key` in `nodes`, used as the renderer's node index.
    pub fn index_of(&self, key: TaxonomyKey) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == key)
    }

    pub fn node(&self, key: TaxonomyKey) -> Option<&FlowNode> {
        self.nodes.iter().find(|n| n.id == key)
    }
}

pub struct LayoutEngine;

impl LayoutEngine {
    /// Horizontal stage for a key.
    pub fn stage(key: TaxonomyKey) -> f64 {
        use TaxonomyKey::*;

        let column = match key {
            Products | Services => 0,
            Revenue => 1,
            CostOfRevenue | GrossProfit => 2,
            OperatingExpenses | OperatingIncome => 3,
            Ebit | OtherIncomeExpense => 4,
            InterestIncome | InterestExpense | Ebt => 5,
            Taxes | NetIncome => 6,
        };
        layout_constants::STAGES[column]
    }

    /// Offset of the `index`-th of `count` nodes in one stage.
    pub fn y_offset(index: usize, count: usize) -> f64 {
        if count <= 1 {
            return layout_constants::Y_CENTER;
        }
        let span = layout_constants::Y_MAX - layout_constants::Y_MIN;
        layout_constants::Y_MIN + (index as f64 / (count - 1) as f64) * span
    }

    pub fn node_color(key: TaxonomyKey, value: f64) -> ColorClass {
        use TaxonomyKey::*;

        match key {
            Products | Services | Revenue => ColorClass::Revenue,
            CostOfRevenue | OperatingExpenses | InterestExpense | Taxes => ColorClass::Expense,
            GrossProfit | OperatingIncome | Ebit | Ebt | NetIncome => ColorClass::Profit,
            InterestIncome => ColorClass::Positive,
            OtherIncomeExpense if value >= 0.0 => ColorClass::Positive,
            OtherIncomeExpense => ColorClass::Negative,
        }
    }

    /// Class of a link, from its endpoints only. Any link touching Taxes is `Tax`.
    pub fn edge_color(source: TaxonomyKey, target: TaxonomyKey) -> ColorClass {
        use TaxonomyKey::*;

        let touches = |key: TaxonomyKey| source == key || target == key;

        if touches(Taxes) {
            ColorClass::Tax
        } else if matches!(source, Products | Services) && target == Revenue {
            ColorClass::Revenue
        } else if matches!(target, CostOfRevenue | OperatingExpenses)
            || matches!(source, CostOfRevenue | OperatingExpenses)
        {
            ColorClass::Expense
        } else if matches!(target, GrossProfit | OperatingIncome | Ebit | Ebt) {
            ColorClass::Profit
        } else if touches(InterestIncome) {
            ColorClass::Positive
        } else if touches(InterestExpense) {
            ColorClass::Negative
        } else if target == NetIncome {
            ColorClass::Profit
        } else {
            ColorClass::Neutral
        }
    }

    pub fn layout(graph: &FlowGraph) -> FlowLayout {
        let mut stages: BTreeMap<u64, Vec<TaxonomyKey>> = BTreeMap::new();
        for node in &graph.nodes {
            stages
                .entry(Self::stage(node.key).to_bits())
                .or_default()
                .push(node.key);
        }
        for members in stages.values_mut() {
            members.sort();
        }

        let nodes = graph
            .nodes
            .iter()
            .map(|node| {
                let stage = Self::stage(node.key);
                let members = &stages[&stage.to_bits()];
                let index = members.iter().position(|k| *k == node.key).unwrap_or(0);

                FlowNode {
                    id: node.key,
                    label: node.key.label().to_string(),
                    value: node.value,
                    stage,
                    y_position: Self::y_offset(index, members.len()),
                    color_class: Self::node_color(node.key, node.value),
                    is_derived: node.is_derived,
                }
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|edge| FlowEdge {
                source: edge.source,
                target: edge.target,
                magnitude: edge.magnitude,
                color_class: Self::edge_color(edge.source, edge.target),
            })
            .collect();

        FlowLayout { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowGraphBuilder;
    use crate::types::BucketSet;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_stage_columns() {
        assert_eq!(LayoutEngine::stage(TaxonomyKey::Products), 0.0);
        assert_eq!(LayoutEngine::stage(TaxonomyKey::Revenue), 0.15);
        assert_eq!(LayoutEngine::stage(TaxonomyKey::OtherIncomeExpense), 0.6);
        assert_eq!(LayoutEngine::stage(TaxonomyKey::Ebt), 0.75);
        assert_eq!(LayoutEngine::stage(TaxonomyKey::NetIncome), 0.9);
    }

    #[test]
    fn test_y_offsets() {
        assert_eq!(LayoutEngine::y_offset(0, 1), 0.5);
        assert_eq!(LayoutEngine::y_offset(0, 2), 0.1);
        assert_eq!(LayoutEngine::y_offset(1, 2), 0.9);
        assert!((LayoutEngine::y_offset(1, 3) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_node_colors() {
        assert_eq!(
            LayoutEngine::node_color(TaxonomyKey::Services, 1.0),
            ColorClass::Revenue
        );
        assert_eq!(
            LayoutEngine::node_color(TaxonomyKey::Taxes, 1.0),
            ColorClass::Expense
        );
        assert_eq!(
            LayoutEngine::node_color(TaxonomyKey::OtherIncomeExpense, 0.0),
            ColorClass::Positive
        );
        assert_eq!(
            LayoutEngine::node_color(TaxonomyKey::OtherIncomeExpense, -20.0),
            ColorClass::Negative
        );
    }

    #[test]
    fn test_edge_colors() {
        use TaxonomyKey::*;

        assert_eq!(LayoutEngine::edge_color(Products, Revenue), ColorClass::Revenue);
        assert_eq!(LayoutEngine::edge_color(Revenue, CostOfRevenue), ColorClass::Expense);
        assert_eq!(LayoutEngine::edge_color(InterestIncome, Ebt), ColorClass::Profit);
        assert_eq!(
            LayoutEngine::edge_color(OperatingIncome, InterestExpense),
            ColorClass::Negative
        );
        assert_eq!(LayoutEngine::edge_color(InterestIncome, NetIncome), ColorClass::Positive);
        assert_eq!(LayoutEngine::edge_color(Taxes, NetIncome), ColorClass::Tax);
        assert_eq!(LayoutEngine::edge_color(Ebt, NetIncome), ColorClass::Profit);
    }

    #[test]
    fn test_routed_expense_links_stay_expense() {
        let buckets = BucketSet::new()
            .with(TaxonomyKey::Revenue, 400.0)
            .with(TaxonomyKey::CostOfRevenue, 150.0)
            .with(TaxonomyKey::GrossProfit, 250.0)
            .with(TaxonomyKey::OperatingExpenses, 100.0)
            .with(TaxonomyKey::NetIncome, 120.0);
        let layout = LayoutEngine::layout(&FlowGraphBuilder::default().build(&buckets));

        for source in [TaxonomyKey::CostOfRevenue, TaxonomyKey::OperatingExpenses] {
            let edge = layout
                .edges
                .iter()
                .find(|e| e.source == source && e.target == TaxonomyKey::NetIncome)
                .unwrap();
            assert_eq!(edge.color_class, ColorClass::Expense, "{}", source);
        }
    }

    #[test]
    fn test_stage_members_ordered_by_taxonomy() {
        let buckets = BucketSet::new()
            .with(TaxonomyKey::OperatingIncome, 200.0)
            .with(TaxonomyKey::InterestIncome, 5.0)
            .with(TaxonomyKey::InterestExpense, 15.0)
            .with(TaxonomyKey::NetIncome, 100.0);
        let layout = LayoutEngine::layout(&FlowGraphBuilder::default().build(&buckets));

        let y = |key| layout.node(key).unwrap().y_position;
        assert!(y(TaxonomyKey::InterestExpense) < y(TaxonomyKey::InterestIncome));
        assert!(y(TaxonomyKey::InterestIncome) < y(TaxonomyKey::Ebt));
        assert_eq!(y(TaxonomyKey::OperatingIncome), 0.5);
    }

    proptest! {
        #[test]
        fn prop_distinct_offsets_within_stage(
            values in proptest::collection::vec(prop_oneof![Just(0.0), 1.0f64..100.0], 12)
        ) {
            let buckets = TaxonomyKey::EXTRACTED
                .into_iter()
                .zip(values)
                .fold(BucketSet::new(), |set, (key, value)| set.with(key, value));
            let layout = LayoutEngine::layout(&FlowGraphBuilder::default().build(&buckets));

            let mut seen = HashSet::new();
            for node in &layout.nodes {
                prop_assert!((0.0..=1.0).contains(&node.y_position));
                prop_assert!(seen.insert((node.stage.to_bits(), node.y_position.to_bits())));
            }
        }
    }
}
