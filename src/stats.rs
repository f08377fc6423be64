//! Descriptive statistics over `f64` samples
//!
//! Median, percentiles (linear interpolation between closest ranks), mean and
//! the normal distribution tail used by the signed-rank approximation.

use serde::Serialize;

/// Sort a copy of the samples in ascending order
fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of already-sorted data (0..=100)
fn percentile_sorted(sorted_data: &[f64], percentile: f64) -> Option<f64> {
    match sorted_data.len() {
        0 => None,
        1 => Some(sorted_data[0]),
        len => {
            let index = (percentile / 100.0) * (len - 1) as f64;
            let lower = index.floor() as usize;
            let upper = index.ceil() as usize;

            if lower == upper {
                Some(sorted_data[lower])
            } else {
                let weight = index - lower as f64;
                Some(sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight)
            }
        }
    }
}

/// Median of the samples, `None` when empty
///
/// Even-length input returns the mean of the two central values.
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Percentile (0..=100) with linear interpolation, `None` when empty
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    percentile_sorted(&sorted(values), pct)
}

/// Arithmetic mean, `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Five-number style summary of one stratum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize the samples, `None` when empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        Some(Self {
            count: sorted.len(),
            mean: mean(&sorted)?,
            q1: percentile_sorted(&sorted, 25.0)?,
            median: percentile_sorted(&sorted, 50.0)?,
            q3: percentile_sorted(&sorted, 75.0)?,
            min: *sorted.first()?,
            max: *sorted.last()?,
        })
    }
}

/// Complementary error function
///
/// Chebyshev-fitted rational approximation with fractional error below
/// 1.2e-7 everywhere.
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let ans = t
        * (-z * z - 1.265_512_23
            + t * (1.000_023_68
                + t * (0.374_091_96
                    + t * (0.096_784_18
                        + t * (-0.186_288_06
                            + t * (0.278_868_07
                                + t * (-1.135_203_98
                                    + t * (1.488_515_87
                                        + t * (-0.822_152_23 + t * 0.170_872_77)))))))))
            .exp();
    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Standard normal survival function `P(Z > z)`
pub fn normal_sf(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Standard normal cumulative distribution `P(Z <= z)`
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}
