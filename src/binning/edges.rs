// Bin edge construction for heavy-tailed positive metrics
//
// 1. values <= 1 are excluded from edge computation
// 2. n_bins + 2 log-uniform points over [min, max], first point dropped,
//    last point nudged above max
// 3. sparse tail bins merged until the last bin holds min_count values
// 4. edges rounded (10 below 10_000, 100 above) and deduplicated
//
// Each refinement step builds a new edge vector.

use crate::binning::config::BinningConfig;
use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Relative nudge applied to the top edge so `max` falls inside the last bin
const TOP_EDGE_NUDGE: f64 = 1e-9;

/// Strictly increasing bin edges
///
/// Bin `i` is `[edges[i], edges[i + 1])`. Values below `edges[0]` belong to
/// bin 0 so the global minimum is always included; values at or above the
/// last edge are out of range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinSpec {
    edges: Vec<f64>,
}

impl BinSpec {
    /// Build from explicit edges
    ///
    /// # Errors
    /// `InvalidValue` unless there are at least two finite, strictly
    /// increasing edges.
    pub fn from_edges(edges: Vec<f64>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(AnalysisError::InvalidValue(format!(
                "bin spec needs at least 2 edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AnalysisError::InvalidValue(format!(
                "bin edges must be finite and strictly increasing: {:?}",
                edges
            )));
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    /// Bin holding `value`, `None` for NaN or values at/above the top edge
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if value.is_nan() || value >= self.edges[self.edges.len() - 1] {
            return None;
        }
        let at_or_below = self.edges.partition_point(|&e| e <= value);
        Some(at_or_below.saturating_sub(1))
    }

    /// Interval label such as `[2710, 100100)`
    ///
    /// Bin 0 also holds everything below `edges[0]`, so it is labelled
    /// `(-inf, hi)`.
    pub fn label(&self, bin_index: usize) -> Option<String> {
        let lo = self.edges.get(bin_index)?;
        let hi = self.edges.get(bin_index + 1)?;
        if bin_index == 0 {
            Some(format!("(-inf, {})", hi))
        } else {
            Some(format!("[{}, {})", lo, hi))
        }
    }
}

/// `count` points spaced uniformly in log10 between `min` and `max`
fn log_space(min: f64, max: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = (min.log10(), max.log10());
    let steps = (count - 1) as f64;
    (0..count)
        .map(|i| match i {
            0 => min,
            i if i == count - 1 => max,
            i => 10f64.powf(lo + (hi - lo) * i as f64 / steps),
        })
        .collect()
}

/// Rounding step for an edge of this magnitude
fn rounding_step(edge: f64) -> f64 {
    if edge < 10_000.0 {
        10.0
    } else {
        100.0
    }
}

/// Remove the second-to-last edge while the last bin is under-populated
///
/// Stops at a single bin. Population counts values `>= ` the cut, matching
/// the half-open bins.
fn merge_sparse_tail(edges: Vec<f64>, values: &[f64], min_count: usize) -> Vec<f64> {
    let mut edges = edges;
    while edges.len() > 2 {
        let cut_index = edges.len() - 2;
        let cut = edges[cut_index];
        let tail = values.iter().filter(|&&v| v >= cut).count();
        if tail >= min_count {
            break;
        }
        tracing::debug!(
            "Merging tail bin at edge {} ({} value(s) < min_count {})",
            cut,
            tail,
            min_count
        );
        edges = edges
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != cut_index)
            .map(|(_, &e)| e)
            .collect();
    }
    edges
}

/// Round edges for display and drop duplicates created by rounding
///
/// Interior edges round to the nearest step; the top edge rounds up to the
/// next step strictly above `max` so the maximum stays in range.
fn round_edges(edges: &[f64], min: f64, max: f64) -> Vec<f64> {
    let top_step = rounding_step(max);
    let top = (max / top_step).floor() * top_step + top_step;

    let mut rounded: Vec<f64> = edges[..edges.len() - 1]
        .iter()
        .map(|&e| {
            let step = rounding_step(e);
            (e / step).round() * step
        })
        .filter(|&e| e < top)
        .collect();
    rounded.push(top);
    rounded.dedup();

    if rounded.len() < 2 {
        let step = rounding_step(min);
        rounded.insert(0, (min / step).floor() * step);
    }
    rounded
}

/// Build adaptive log bins over the reference values
///
/// # Errors
/// - `InvalidConfig` for `n_bins == 0`
/// - `InsufficientRange` when fewer than two distinct values exceed 1
///
/// # Example
/// ```
/// use benchstrata::binning::{build_bin_spec, BinningConfig};
///
/// let sizes = [2.0, 5_000.0, 50_000.0, 100_000.0];
/// let config = BinningConfig { n_bins: 2, min_count: 1 };
/// let spec = build_bin_spec(sizes.iter().copied(), &config).unwrap();
/// assert_eq!(spec.edges(), &[70.0, 2710.0, 100_100.0]);
/// ```
pub fn build_bin_spec(
    reference: impl IntoIterator<Item = f64>,
    config: &BinningConfig,
) -> Result<BinSpec> {
    config.validate()?;

    let usable: Vec<f64> = reference
        .into_iter()
        .filter(|v| v.is_finite() && *v > 1.0)
        .collect();
    let min = usable.iter().copied().fold(f64::INFINITY, f64::min);
    let max = usable.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if usable.len() < 2 || min >= max {
        return Err(AnalysisError::InsufficientRange {
            usable: usable.len(),
        });
    }

    let mut edges: Vec<f64> = log_space(min, max, config.n_bins + 2)
        .into_iter()
        .skip(1)
        .collect();
    if let Some(top) = edges.last_mut() {
        *top = max * (1.0 + TOP_EDGE_NUDGE);
    }

    let merged = merge_sparse_tail(edges, &usable, config.min_count);
    let rounded = round_edges(&merged, min, max);
    tracing::debug!(
        "Built {} bin(s) from {} reference value(s): {:?}",
        rounded.len() - 1,
        usable.len(),
        rounded
    );
    BinSpec::from_edges(rounded)
}
