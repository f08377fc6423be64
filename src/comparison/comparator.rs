// Paired comparison of two variants over their common files
//
// Pipeline: intersect file sets -> d_i = a_i - b_i -> drop zeros ->
// signed-rank test -> normalized W and rank-biserial correlation.

use crate::comparison::config::{Alternative, ComparisonConfig, LowSamplePolicy};
use crate::comparison::signed_rank::{signed_rank_test, PValueMethod};
use crate::error::{AnalysisError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of comparing variant A against variant B
///
/// `rank_biserial_correlation` is positive when A tends to exceed B. For
/// runtimes that means A is slower.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub variant_a: String,
    pub variant_b: String,
    /// Files measured under both variants
    pub common: usize,
    /// Non-zero differences actually ranked
    pub n: usize,
    /// Reported statistic: W+
    pub w_statistic: f64,
    pub w_plus: f64,
    pub w_minus: f64,
    /// `W+ / (n(n+1)/2)`, in `[0, 1]`
    pub normalized_w: f64,
    pub p_value: f64,
    pub z_score: Option<f64>,
    pub method: PValueMethod,
    pub alternative: Alternative,
    /// `(W+ - W-) / (W+ + W-)`, in `[-1, 1]`
    pub rank_biserial_correlation: f64,
}

impl ComparisonResult {
    /// `min(W+, W-)`, the conventional two-sided statistic
    pub fn two_sided_statistic(&self) -> f64 {
        self.w_plus.min(self.w_minus)
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// A computed comparison, flagged when it rests on too few pairs
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    Reliable(ComparisonResult),
    /// Computed, but `n < required`; should be shown with a warning
    LowSampleSize {
        result: ComparisonResult,
        required: usize,
    },
}

impl ComparisonOutcome {
    pub fn result(&self) -> &ComparisonResult {
        match self {
            ComparisonOutcome::Reliable(result) => result,
            ComparisonOutcome::LowSampleSize { result, .. } => result,
        }
    }

    pub fn into_result(self) -> ComparisonResult {
        match self {
            ComparisonOutcome::Reliable(result) => result,
            ComparisonOutcome::LowSampleSize { result, .. } => result,
        }
    }

    pub fn is_low_sample(&self) -> bool {
        matches!(self, ComparisonOutcome::LowSampleSize { .. })
    }
}

fn check_value(variant: &str, file: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::InvalidValue(format!(
            "estimate {} for file '{}' / variant '{}' must be finite and > 0",
            value, file, variant
        )))
    }
}

/// Compare variant A against variant B over the files both were measured on
///
/// Both maps are keyed by file id. The result is independent of map
/// iteration order.
///
/// # Errors
/// - `NoOverlap` when no file is shared
/// - `InvalidValue` when a shared estimate is non-finite or not positive
/// - `DegenerateComparison` when every shared difference is zero
/// - `LowSampleSize` when `n < min_sample_size` and the policy is `Skip`
///
/// # Example
/// ```
/// use benchstrata::comparison::{compare_variants, ComparisonConfig};
/// use std::collections::BTreeMap;
///
/// let a: BTreeMap<String, f64> =
///     [("f1", 10.0), ("f2", 12.0), ("f3", 11.0)].map(|(f, v)| (f.to_string(), v)).into();
/// let b: BTreeMap<String, f64> =
///     [("f1", 9.0), ("f2", 9.0), ("f3", 10.0)].map(|(f, v)| (f.to_string(), v)).into();
///
/// let outcome = compare_variants("A", &a, "B", &b, &ComparisonConfig::default()).unwrap();
/// assert!(outcome.is_low_sample());
/// assert_eq!(outcome.result().rank_biserial_correlation, 1.0);
/// ```
pub fn compare_variants(
    variant_a: &str,
    a: &BTreeMap<String, f64>,
    variant_b: &str,
    b: &BTreeMap<String, f64>,
    config: &ComparisonConfig,
) -> Result<ComparisonOutcome> {
    config.validate()?;

    let mut differences = Vec::new();
    let mut common = 0;
    for (file, &value_a) in a {
        let Some(&value_b) = b.get(file) else {
            continue;
        };
        check_value(variant_a, file, value_a)?;
        check_value(variant_b, file, value_b)?;
        common += 1;

        let d = value_a - value_b;
        if d != 0.0 {
            differences.push(d);
        }
    }

    if common == 0 {
        return Err(AnalysisError::NoOverlap {
            variant_a: variant_a.to_string(),
            variant_b: variant_b.to_string(),
        });
    }

    let Some(test) = signed_rank_test(&differences, config) else {
        return Err(AnalysisError::DegenerateComparison {
            variant_a: variant_a.to_string(),
            variant_b: variant_b.to_string(),
            common,
        });
    };

    let max_rank_sum = test.max_rank_sum();
    let result = ComparisonResult {
        variant_a: variant_a.to_string(),
        variant_b: variant_b.to_string(),
        common,
        n: test.n,
        w_statistic: test.w_plus,
        w_plus: test.w_plus,
        w_minus: test.w_minus,
        normalized_w: test.w_plus / max_rank_sum,
        p_value: test.p_value,
        z_score: test.z_score,
        method: test.method,
        alternative: config.alternative,
        rank_biserial_correlation: (test.w_plus - test.w_minus) / (test.w_plus + test.w_minus),
    };

    if result.n >= config.min_sample_size {
        return Ok(ComparisonOutcome::Reliable(result));
    }

    match config.low_sample_policy {
        LowSamplePolicy::Warn => {
            tracing::warn!(
                "Comparison {} vs {} rests on {} non-tied pair(s) (< {})",
                variant_a,
                variant_b,
                result.n,
                config.min_sample_size
            );
            Ok(ComparisonOutcome::LowSampleSize {
                result,
                required: config.min_sample_size,
            })
        }
        LowSamplePolicy::Skip => Err(AnalysisError::LowSampleSize {
            variant_a: variant_a.to_string(),
            variant_b: variant_b.to_string(),
            n: result.n,
            required: config.min_sample_size,
        }),
    }
}
