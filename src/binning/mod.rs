// Adaptive logarithmic binning for size-stratified aggregation
//
// Input sizes (e.g. AST node counts) span several orders of magnitude and
// are strongly right-skewed. Bins are spaced in log scale over a reference
// x-axis, the sparse tail is merged until it holds a meaningful population,
// and every dataset sharing that reference is stratified into the result.

mod assign;
mod config;
mod edges;

pub use assign::{assign, summarize, BinSummary, BinnedDataset, BinnedPoint};
pub use config::BinningConfig;
pub use edges::{build_bin_spec, BinSpec};

use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;

/// Bin spec plus the binned points of every dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binning {
    pub spec: BinSpec,
    pub datasets: Vec<BinnedDataset>,
}

impl Binning {
    /// Per-bin summaries of every dataset, dataset-major
    pub fn summaries(&self) -> Vec<BinSummary> {
        self.datasets
            .iter()
            .flat_map(|d| summarize(&self.spec, d))
            .collect()
    }
}

/// Build bins over `reference` and stratify every dataset into them
///
/// `reference` maps file id to the x-axis metric; `datasets` maps a dataset
/// label to its per-file values.
pub fn bin_datasets(
    reference: &BTreeMap<String, f64>,
    datasets: &BTreeMap<String, BTreeMap<String, f64>>,
    config: &BinningConfig,
) -> Result<Binning> {
    let spec = build_bin_spec(reference.values().copied(), config)?;
    let datasets = datasets
        .iter()
        .map(|(label, values)| assign(&spec, reference, label, values))
        .collect();
    Ok(Binning { spec, datasets })
}
