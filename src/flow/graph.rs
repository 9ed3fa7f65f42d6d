//! Flow Graph Construction
//!
//! Derives EBIT/EBT, selects the node set, and evaluates a fixed-order table
//! of presence-guarded edge rules. Net Income is always the sink of a non-empty
//! graph, even when its value is zero. Any node still without an outgoing edge
//! after the rules is routed into it.

use std::collections::BTreeSet;
use tracing::debug;

use crate::constants::chart as chart_constants;
use crate::types::{BucketSet, TaxonomyKey};

use TaxonomyKey::{
    CostOfRevenue, Ebit, Ebt, GrossProfit, InterestExpense, InterestIncome, NetIncome,
    OperatingExpenses, OperatingIncome, OtherIncomeExpense, Products, Revenue, Services, Taxes,
};

/// Keys that take part in one graph build.
pub type NodeSet = BTreeSet<TaxonomyKey>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub key: TaxonomyKey,
    pub value: f64,
    pub is_derived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub source: TaxonomyKey,
    pub target: TaxonomyKey,
    /// Display magnitude of the target node
    pub magnitude: f64,
}

/// Nodes in taxonomy order plus edges in rule order.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    pub fn node(&self, key: TaxonomyKey) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn contains(&self, key: TaxonomyKey) -> bool {
        self.node(key).is_some()
    }

    pub fn has_edge(&self, source: TaxonomyKey, target: TaxonomyKey) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn out_degree(&self, key: TaxonomyKey) -> usize {
        self.edges.iter().filter(|e| e.source == key).count()
    }

    pub fn has_derived(&self) -> bool {
        self.nodes.iter().any(|n| n.is_derived)
    }
}

// =============================================================================
// Edge Rules
// =============================================================================

/// Edges added when `applies` holds, each only if both endpoints are nodes.
struct EdgeRule {
    name: &'static str,
    applies: fn(&NodeSet) -> bool,
    edges: &'static [(TaxonomyKey, TaxonomyKey)],
}

fn always(_: &NodeSet) -> bool {
    true
}

fn has_ebit(nodes: &NodeSet) -> bool {
    nodes.contains(&Ebit)
}

fn lacks_ebit(nodes: &NodeSet) -> bool {
    !nodes.contains(&Ebit)
}

fn has_ebit_and_ebt(nodes: &NodeSet) -> bool {
    nodes.contains(&Ebit) && nodes.contains(&Ebt)
}

fn has_ebt(nodes: &NodeSet) -> bool {
    nodes.contains(&Ebt)
}

fn lacks_ebt(nodes: &NodeSet) -> bool {
    !nodes.contains(&Ebt)
}

fn lacks_intermediates(nodes: &NodeSet) -> bool {
    !nodes.contains(&Ebit) && !nodes.contains(&Ebt)
}

const EDGE_RULES: &[EdgeRule] = &[
    EdgeRule {
        name: "revenue aggregation",
        applies: always,
        edges: &[(Products, Revenue), (Services, Revenue)],
    },
    EdgeRule {
        name: "revenue split",
        applies: always,
        edges: &[(Revenue, CostOfRevenue), (Revenue, GrossProfit)],
    },
    EdgeRule {
        name: "profit split",
        applies: always,
        edges: &[(GrossProfit, OperatingExpenses), (GrossProfit, OperatingIncome)],
    },
    EdgeRule {
        name: "into EBIT",
        applies: has_ebit,
        edges: &[(OperatingIncome, Ebit), (OtherIncomeExpense, Ebit)],
    },
    EdgeRule {
        name: "flattened below operating income",
        applies: lacks_ebit,
        edges: &[
            (OperatingIncome, InterestIncome),
            (OperatingIncome, InterestExpense),
            (OperatingIncome, OtherIncomeExpense),
        ],
    },
    EdgeRule {
        name: "into EBT",
        applies: has_ebit_and_ebt,
        edges: &[(Ebit, Ebt), (InterestIncome, Ebt), (InterestExpense, Ebt)],
    },
    EdgeRule {
        name: "EBT to net income",
        applies: has_ebt,
        edges: &[(Ebt, NetIncome), (Taxes, NetIncome)],
    },
    EdgeRule {
        name: "operating income to net income",
        applies: lacks_ebt,
        edges: &[(OperatingIncome, NetIncome), (Taxes, NetIncome)],
    },
    EdgeRule {
        name: "interest to net income",
        applies: lacks_intermediates,
        edges: &[(InterestIncome, NetIncome), (InterestExpense, NetIncome)],
    },
];

// =============================================================================
// Builder
// =============================================================================

pub struct FlowGraphBuilder {
    min_display_value: f64,
}

impl Default for FlowGraphBuilder {
    fn default() -> Self {
        Self::new(chart_constants::MIN_DISPLAY_VALUE)
    }
}

impl FlowGraphBuilder {
    pub fn new(min_display_value: f64) -> Self {
        Self { min_display_value }
    }

    /// Copy of `buckets` with EBIT and EBT computed where possible.
    ///
    /// EBIT = Operating Income + Other Income/Expense, when Operating Income is
    /// present and EBIT was not supplied. EBT = EBIT + Interest Income -
    /// Interest Expense, when EBIT exists and EBT was not supplied.
    pub fn derive(buckets: &BucketSet) -> BucketSet {
        let mut derived = buckets.clone();

        if derived.is_present(OperatingIncome) && !derived.is_present(Ebit) {
            let ebit = derived.value(OperatingIncome) + derived.value(OtherIncomeExpense);
            debug!("Derived EBIT = {}", ebit);
            derived.set_derived(Ebit, ebit);
        }

        let has_ebit = derived.is_present(Ebit) || derived.is_derived(Ebit);
        if has_ebit && !derived.is_present(Ebt) {
            let ebt = derived.value(Ebit) + derived.value(InterestIncome)
                - derived.value(InterestExpense);
            debug!("Derived EBT = {}", ebt);
            derived.set_derived(Ebt, ebt);
        }

        derived
    }

    /// Present keys plus anything derived, even when the derived value is zero.
    /// Net Income joins any non-empty set as the sink.
    pub fn node_set(buckets: &BucketSet) -> NodeSet {
        let mut nodes: NodeSet = buckets
            .iter()
            .filter(|b| b.is_derived || b.value != 0.0)
            .map(|b| b.name)
            .collect();
        if !nodes.is_empty() {
            nodes.insert(NetIncome);
        }
        nodes
    }

    pub fn build(&self, buckets: &BucketSet) -> FlowGraph {
        let buckets = Self::derive(buckets);
        let node_set = Self::node_set(&buckets);

        let nodes: Vec<GraphNode> = buckets
            .iter()
            .filter(|b| node_set.contains(&b.name))
            .map(|b| GraphNode {
                key: b.name,
                value: b.value,
                is_derived: b.is_derived,
            })
            .collect();

        let mut links: Vec<(TaxonomyKey, TaxonomyKey)> = Vec::new();
        for rule in EDGE_RULES.iter().filter(|r| (r.applies)(&node_set)) {
            for &(source, target) in rule.edges {
                if node_set.contains(&source)
                    && node_set.contains(&target)
                    && !links.contains(&(source, target))
                {
                    debug!("{}: {} -> {}", rule.name, source, target);
                    links.push((source, target));
                }
            }
        }

        for &key in node_set.iter().filter(|k| **k != NetIncome) {
            if !links.iter().any(|(source, _)| *source == key) {
                debug!("Routing orphan {} into {}", key, NetIncome);
                links.push((key, NetIncome));
            }
        }

        let edges = links
            .into_iter()
            .map(|(source, target)| GraphEdge {
                source,
                target,
                magnitude: buckets.value(target).abs().max(self.min_display_value),
            })
            .collect();

        FlowGraph { nodes, edges }
    }
}

// =============================================================================
// Tests
// =============================================================================
