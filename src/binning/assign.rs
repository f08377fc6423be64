// Assigning per-file metrics to reference bins and summarizing each stratum

use crate::binning::edges::BinSpec;
use crate::stats::Summary;
use serde::Serialize;
use std::collections::BTreeMap;

/// One data point placed in a bin, tagged with its dataset label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedPoint {
    pub bin_index: usize,
    pub label: String,
    pub file_id: String,
    pub value: f64,
}

/// Binned points of one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinnedDataset {
    pub label: String,
    pub points: Vec<BinnedPoint>,
    /// Files with no reference x, or whose x falls outside the bin spec
    pub unbinned: Vec<String>,
}

/// Statistics of one (dataset, bin) stratum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSummary {
    pub label: String,
    pub bin_index: usize,
    pub interval: String,
    /// `None` when the bin received no point from this dataset
    pub summary: Option<Summary>,
}

/// Place every value of a dataset in the bin of its file's reference x
///
/// `reference` maps file id to x; `values` maps file id to the metric being
/// stratified. Files missing from the reference, or whose x is out of range,
/// are listed in [`BinnedDataset::unbinned`].
pub fn assign(
    spec: &BinSpec,
    reference: &BTreeMap<String, f64>,
    label: &str,
    values: &BTreeMap<String, f64>,
) -> BinnedDataset {
    let mut dataset = BinnedDataset {
        label: label.to_string(),
        points: Vec::with_capacity(values.len()),
        unbinned: Vec::new(),
    };

    for (file_id, &value) in values {
        match reference.get(file_id).and_then(|&x| spec.bin_index(x)) {
            Some(bin_index) => dataset.points.push(BinnedPoint {
                bin_index,
                label: label.to_string(),
                file_id: file_id.clone(),
                value,
            }),
            None => dataset.unbinned.push(file_id.clone()),
        }
    }

    if !dataset.unbinned.is_empty() {
        tracing::warn!(
            "{} file(s) of dataset '{}' could not be binned",
            dataset.unbinned.len(),
            label
        );
    }
    dataset
}

/// Per-bin summaries of one dataset, one entry for every bin of `spec`
pub fn summarize(spec: &BinSpec, dataset: &BinnedDataset) -> Vec<BinSummary> {
    let mut per_bin: Vec<Vec<f64>> = vec![Vec::new(); spec.bin_count()];
    for point in &dataset.points {
        if let Some(bucket) = per_bin.get_mut(point.bin_index) {
            bucket.push(point.value);
        }
    }

    per_bin
        .iter()
        .enumerate()
        .map(|(bin_index, values)| BinSummary {
            label: dataset.label.clone(),
            bin_index,
            interval: spec.label(bin_index).unwrap_or_default(),
            summary: Summary::from_values(values),
        })
        .collect()
}
