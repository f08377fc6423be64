//! benchstrata - statistics engine for repeated benchmark measurements
//!
//! Takes per-(file, variant, run) measurements of competing algorithm
//! variants and produces:
//! - robust per-(file, variant) estimates (median after warm-up exclusion)
//! - paired Wilcoxon signed-rank comparisons with rank-biserial effect sizes
//! - adaptive log-binning of heavy-tailed size metrics for stratified summaries
//!
//! All computations are deterministic, side-effect free and operate on fully
//! materialized in-memory tables.

pub mod aggregate;
pub mod binning;
pub mod cli;
pub mod comparison;
pub mod config;
pub mod error;
pub mod ingest;
pub mod record;
pub mod report;
pub mod stats;

pub use error::{AnalysisError, Result};
