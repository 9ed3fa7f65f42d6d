//! finflow - Financial Flow Extraction and Sankey Graphs
//!
//! Turns a line-item summary of a financial filing into a reconciled set of
//! taxonomy buckets and a positioned, colored flow graph for a Sankey renderer.
//!
//! ## Pipeline
//!
//! ```text
//! summary text -> ExtractionPipeline (model, else pattern table)
//!              -> Reconciler (Products + Services ≈ Revenue)
//!              -> bucket file
//!              -> FlowGraphBuilder (EBIT/EBT, presence-driven edges)
//!              -> LayoutEngine (stages, offsets, color classes)
//!              -> SankeyChart
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use finflow::{Config, analyze_summary, visualize_buckets, create_provider};
//!
//! let config = Config::default();
//! let provider = create_provider(&config.llm)?;
//! let analysis = analyze_summary(path, None, &config, provider).await?;
//! let chart = visualize_buckets(&analysis.buckets_path, None, &config.chart)?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: text-generation providers, prompts, response cleanup
//! - [`extract`]: value parsing, model and pattern extraction
//! - [`reconcile`]: revenue component reconciliation
//! - [`flow`]: graph construction, layout, chart description
//! - [`storage`]: bucket file I/O
//! - [`config`]: layered configuration

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod extract;
pub mod flow;
pub mod reconcile;
pub mod storage;
pub mod types;

// Configuration
pub use config::{ColorScheme, Config, ConfigLoader, FailurePolicy};

// Error Types
pub use types::error::{ErrorCategory, FinflowError, LlmError, Result};

// Domain
pub use types::{Bucket, BucketRecord, BucketSet, TaxonomyKey};

// Providers
pub use ai::{LlmProvider, OllamaCliProvider, OllamaProvider, SharedProvider, create_provider};

// Pipeline
pub use extract::{
    Analysis, Extraction, ExtractionPipeline, ExtractionSource, FallbackExtractor,
    PrimaryExtractor, Unusable, analyze_summary,
};
pub use flow::{
    FlowGraph, FlowGraphBuilder, FlowLayout, LayoutEngine, SankeyChart, visualize_buckets,
};
pub use reconcile::{BreakdownOutcome, ReconcileReport, Reconciler, Reconciliation};
