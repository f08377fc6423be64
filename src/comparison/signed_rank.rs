// Wilcoxon signed-rank statistic and p-value
//
// Regime selection:
// - exact null distribution when n <= exact_max_n and |d| has no ties
// - normal approximation with tie-corrected variance otherwise, with an
//   optional 0.5 continuity correction
//
// The reported statistic is W+, the rank sum of positive differences.

use crate::comparison::config::{Alternative, ComparisonConfig};
use crate::comparison::ranks::average_ranks;
use crate::stats::{normal_cdf, normal_sf};
use serde::{Deserialize, Serialize};

/// How the p-value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PValueMethod {
    Exact,
    Normal,
}

/// Rank sums and significance of one set of non-zero paired differences
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRankTest {
    pub n: usize,
    pub w_plus: f64,
    pub w_minus: f64,
    pub method: PValueMethod,
    /// Standardized statistic, only in the normal regime
    pub z_score: Option<f64>,
    pub p_value: f64,
}

impl SignedRankTest {
    /// Maximum possible rank sum `n(n+1)/2`
    pub fn max_rank_sum(&self) -> f64 {
        let n = self.n as f64;
        n * (n + 1.0) / 2.0
    }
}

/// Number of subsets of `{1..=n}` summing to each `k` in `0..=n(n+1)/2`
///
/// Under the null hypothesis every sign assignment is equally likely, so
/// `counts[k] / 2^n = P(W+ = k)`.
pub fn exact_null_counts(n: usize) -> Vec<f64> {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        let reachable = rank * (rank + 1) / 2;
        for k in (rank..=reachable).rev() {
            counts[k] += counts[k - rank];
        }
    }
    counts
}

/// Exact p-value for an integer-valued `W+`
fn exact_p_value(n: usize, w_plus: f64, alternative: Alternative) -> f64 {
    let counts = exact_null_counts(n);
    let total = 2.0_f64.powi(n as i32);
    let w = w_plus.round() as usize;

    let cdf = counts[..=w].iter().sum::<f64>() / total;
    let sf = counts[w..].iter().sum::<f64>() / total;

    match alternative {
        Alternative::Greater => sf,
        Alternative::Less => cdf,
        Alternative::TwoSided => (2.0 * cdf.min(sf)).min(1.0),
    }
}

/// Normal-approximation z and p-value
fn normal_p_value(
    n: usize,
    w_plus: f64,
    tie_correction: f64,
    alternative: Alternative,
    continuity_correction: bool,
) -> (f64, f64) {
    let n = n as f64;
    let mean = n * (n + 1.0) / 4.0;
    let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - tie_correction / 48.0;
    let sd = variance.sqrt();

    let delta = w_plus - mean;
    // No shift at the null center; f64::signum(0.0) is 1.0
    let shift = if !continuity_correction || delta == 0.0 {
        0.0
    } else {
        match alternative {
            Alternative::Greater => 0.5,
            Alternative::Less => -0.5,
            Alternative::TwoSided => 0.5 * delta.signum(),
        }
    };
    let z = (delta - shift) / sd;

    let p = match alternative {
        Alternative::Greater => normal_sf(z),
        Alternative::Less => normal_cdf(z),
        Alternative::TwoSided => (2.0 * normal_sf(z.abs())).min(1.0),
    };
    (z, p)
}

/// Run the signed-rank test on non-zero differences `d_i = a_i - b_i`
///
/// Returns `None` when `differences` is empty. Zero differences must be
/// removed by the caller; they are not ranked.
pub fn signed_rank_test(differences: &[f64], config: &ComparisonConfig) -> Option<SignedRankTest> {
    if differences.is_empty() {
        return None;
    }
    let n = differences.len();

    let magnitudes: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
    let ranking = average_ranks(&magnitudes);

    let (w_plus, w_minus) = differences.iter().zip(&ranking.ranks).fold(
        (0.0, 0.0),
        |(plus, minus), (&d, &rank)| {
            if d > 0.0 {
                (plus + rank, minus)
            } else {
                (plus, minus + rank)
            }
        },
    );

    let use_exact = n <= config.exact_max_n && !ranking.has_ties();
    tracing::debug!(
        "Signed-rank n={} W+={} W-={} ties={} regime={}",
        n,
        w_plus,
        w_minus,
        ranking.tie_groups.len(),
        if use_exact { "exact" } else { "normal" }
    );

    let (method, z_score, p_value) = if use_exact {
        (
            PValueMethod::Exact,
            None,
            exact_p_value(n, w_plus, config.alternative),
        )
    } else {
        let (z, p) = normal_p_value(
            n,
            w_plus,
            ranking.tie_correction(),
            config.alternative,
            config.continuity_correction,
        );
        (PValueMethod::Normal, Some(z), p)
    };

    Some(SignedRankTest {
        n,
        w_plus,
        w_minus,
        method,
        z_score,
        p_value,
    })
}
