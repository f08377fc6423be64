//! Collapse repeated runs into one robust estimate per (file, variant)
//!
//! Runs are ordered by run index, the first `warmup` runs are dropped and the
//! median of the rest becomes the [`PointEstimate`].

use crate::error::{AnalysisError, Result};
use crate::record::{Observation, PointEstimate};
use crate::stats;
use std::collections::BTreeMap;

/// Estimates for all (file, variant) pairs plus the pairs that had no usable run
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One estimate per pair, ordered by (variant, file)
    pub estimates: Vec<PointEstimate>,
    /// `InsufficientData` errors for pairs left empty after warm-up exclusion
    pub insufficient: Vec<AnalysisError>,
}

impl Aggregation {
    /// Group estimates into `variant -> file -> value`
    pub fn by_variant(&self) -> EstimateTable {
        EstimateTable::from_estimates(&self.estimates)
    }
}

/// Point estimates keyed by variant then file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EstimateTable {
    variants: BTreeMap<String, BTreeMap<String, f64>>,
}

impl EstimateTable {
    pub fn from_estimates(estimates: &[PointEstimate]) -> Self {
        let mut variants: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
        for e in estimates {
            variants
                .entry(e.variant_id.clone())
                .or_default()
                .insert(e.file_id.clone(), e.value);
        }
        Self { variants }
    }

    /// Estimates of one variant keyed by file, if the variant is present
    pub fn variant(&self, variant_id: &str) -> Option<&BTreeMap<String, f64>> {
        self.variants.get(variant_id)
    }

    /// Variant names in sorted order
    pub fn variant_ids(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Median of the runs left after dropping the first `warmup` by run index
fn median_after_warmup(mut runs: Vec<&Observation>, warmup: usize) -> Option<f64> {
    runs.sort_by_key(|o| o.run_index);
    let kept: Vec<f64> = runs.iter().skip(warmup).map(|o| o.runtime).collect();
    stats::median(&kept)
}

/// Estimate a single requested (file, variant) pair
///
/// # Errors
/// `InsufficientData` when no run remains after warm-up exclusion (including
/// when the pair was never observed).
pub fn estimate(
    observations: &[Observation],
    file_id: &str,
    variant_id: &str,
    warmup: usize,
) -> Result<PointEstimate> {
    let runs: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.file_id == file_id && o.variant_id == variant_id)
        .collect();
    let recorded = runs.len();

    match median_after_warmup(runs, warmup) {
        Some(value) => Ok(PointEstimate {
            file_id: file_id.to_string(),
            variant_id: variant_id.to_string(),
            value,
        }),
        None => Err(AnalysisError::InsufficientData {
            file_id: file_id.to_string(),
            variant_id: variant_id.to_string(),
            runs: recorded,
            warmup,
        }),
    }
}

/// Estimate every (file, variant) pair present in the observations
///
/// Pairs with no run left after warm-up exclusion are reported in
/// [`Aggregation::insufficient`] instead of being dropped silently.
pub fn aggregate(observations: &[Observation], warmup: usize) -> Aggregation {
    let mut groups: BTreeMap<(&str, &str), Vec<&Observation>> = BTreeMap::new();
    for o in observations {
        groups
            .entry((o.variant_id.as_str(), o.file_id.as_str()))
            .or_default()
            .push(o);
    }

    let mut aggregation = Aggregation::default();
    for ((variant_id, file_id), runs) in groups {
        let recorded = runs.len();
        match median_after_warmup(runs, warmup) {
            Some(value) => aggregation.estimates.push(PointEstimate {
                file_id: file_id.to_string(),
                variant_id: variant_id.to_string(),
                value,
            }),
            None => {
                tracing::debug!(
                    "No runs left for {}/{} after discarding {} warm-up run(s)",
                    file_id,
                    variant_id,
                    warmup
                );
                aggregation.insufficient.push(AnalysisError::InsufficientData {
                    file_id: file_id.to_string(),
                    variant_id: variant_id.to_string(),
                    runs: recorded,
                    warmup,
                });
            }
        }
    }

    tracing::debug!(
        "Aggregated {} observation(s) into {} estimate(s), {} pair(s) insufficient",
        observations.len(),
        aggregation.estimates.len(),
        aggregation.insufficient.len()
    );
    aggregation
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(file: &str, variant: &str, run: u32, runtime: f64) -> Observation {
        Observation::new(file, variant, run, runtime)
    }

    #[test]
    fn test_singleton_runs_are_their_own_median() {
        let observations = vec![
            obs("f1", "A", 0, 10.0),
            obs("f2", "A", 0, 12.0),
            obs("f3", "A", 0, 11.0),
            obs("f1", "B", 0, 9.0),
            obs("f2", "B", 0, 9.0),
            obs("f3", "B", 0, 10.0),
        ];
        let agg = aggregate(&observations, 0);
        assert!(agg.insufficient.is_empty());

        let table = agg.by_variant();
        let a = table.variant("A").unwrap();
        assert_eq!(a["f1"], 10.0);
        assert_eq!(a["f2"], 12.0);
        assert_eq!(a["f3"], 11.0);
        let b = table.variant("B").unwrap();
        assert_eq!(b["f3"], 10.0);
    }

    #[test]
    fn test_warmup_drops_lowest_run_indices() {
        // Run 0 is a cold outlier even though it is listed last
        let observations = vec![
            obs("f1", "A", 1, 10.0),
            obs("f1", "A", 2, 12.0),
            obs("f1", "A", 3, 11.0),
            obs("f1", "A", 0, 500.0),
        ];
        let e = estimate(&observations, "f1", "A", 1).unwrap();
        assert_eq!(e.value, 11.0);

        let e = estimate(&observations, "f1", "A", 0).unwrap();
        assert_eq!(e.value, 11.5);
    }

    #[test]
    fn test_everything_discarded_is_insufficient() {
        let observations = vec![obs("f1", "A", 0, 10.0), obs("f1", "A", 1, 11.0)];
        let err = estimate(&observations, "f1", "A", 2).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientData { runs: 2, warmup: 2, .. }
        ));

        let agg = aggregate(&observations, 5);
        assert!(agg.estimates.is_empty());
        assert_eq!(agg.insufficient.len(), 1);
    }

    #[test]
    fn test_unknown_pair_is_insufficient() {
        let observations = vec![obs("f1", "A", 0, 10.0)];
        assert!(estimate(&observations, "f9", "A", 0).is_err());
    }

    #[test]
    fn test_reaggregation_is_idempotent() {
        let observations = vec![
            obs("f1", "A", 0, 3.0),
            obs("f1", "A", 1, 7.0),
            obs("f1", "A", 2, 5.0),
            obs("f2", "A", 0, 1.25),
            obs("f2", "B", 0, 2.5),
        ];
        let first = aggregate(&observations, 0);
        let again: Vec<Observation> = first
            .estimates
            .iter()
            .map(|e| obs(&e.file_id, &e.variant_id, 0, e.value))
            .collect();
        let second = aggregate(&again, 0);
        assert_eq!(first.estimates, second.estimates);
    }
}
