// Configuration for paired signed-rank comparisons
//
// Covers the sample-size floor, the exact/normal regime switch and the
// hypothesis direction.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Alternative hypothesis for the signed-rank test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// A and B differ in either direction
    #[default]
    TwoSided,
    /// A tends to exceed B
    Greater,
    /// A tends to fall below B
    Less,
}

/// What to do with a comparison that has fewer pairs than `min_sample_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LowSamplePolicy {
    /// Compute the result but flag it as low-sample
    #[default]
    Warn,
    /// Return a `LowSampleSize` error instead of a result
    Skip,
}

/// Configuration for paired variant comparisons
///
/// # Example
/// ```
/// use benchstrata::comparison::ComparisonConfig;
///
/// let config = ComparisonConfig::default();
/// assert_eq!(config.min_sample_size, 10);
/// assert_eq!(config.exact_max_n, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Significance level used by `ComparisonResult::is_significant` in reports
    pub significance_level: f64,

    /// Non-tied pairs below which a comparison is flagged (or skipped)
    ///
    /// Default: 10
    pub min_sample_size: usize,

    /// Largest `n` for which the exact null distribution is used
    ///
    /// The exact distribution is only valid for integer ranks, so any tie
    /// among |d| forces the normal approximation regardless of `n`.
    ///
    /// Default: 50
    pub exact_max_n: usize,

    /// Apply a 0.5 continuity correction in the normal regime
    ///
    /// Default: false
    pub continuity_correction: bool,

    pub alternative: Alternative,

    pub low_sample_policy: LowSamplePolicy,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            significance_level: 0.05,
            min_sample_size: 10,
            exact_max_n: 50,
            continuity_correction: false,
            alternative: Alternative::TwoSided,
            low_sample_policy: LowSamplePolicy::Warn,
        }
    }
}

impl ComparisonConfig {
    /// Stricter configuration: 99% confidence, low-sample comparisons skipped
    pub fn strict() -> Self {
        Self {
            significance_level: 0.01,
            min_sample_size: 20,
            continuity_correction: true,
            low_sample_policy: LowSamplePolicy::Skip,
            ..Self::default()
        }
    }

    /// Looser configuration: 90% confidence, small comparisons still reported
    pub fn permissive() -> Self {
        Self {
            significance_level: 0.10,
            min_sample_size: 5,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(AnalysisError::InvalidConfig(format!(
                "significance_level must be in [0, 1], got {}",
                self.significance_level
            )));
        }

        if self.min_sample_size == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_sample_size must be >= 1".to_string(),
            ));
        }

        // Subset counts up to 2^n must stay exact in an f64 mantissa
        if self.exact_max_n > 52 {
            return Err(AnalysisError::InvalidConfig(format!(
                "exact_max_n must be <= 52, got {}",
                self.exact_max_n
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComparisonConfig::default();
        assert_eq!(config.significance_level, 0.05);
        assert_eq!(config.min_sample_size, 10);
        assert!(!config.continuity_correction);
        assert_eq!(config.alternative, Alternative::TwoSided);
        assert_eq!(config.low_sample_policy, LowSamplePolicy::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        assert!(ComparisonConfig::strict().validate().is_ok());
        assert!(ComparisonConfig::permissive().validate().is_ok());
        assert_eq!(
            ComparisonConfig::strict().low_sample_policy,
            LowSamplePolicy::Skip
        );
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_significance_level() {
        let mut config = ComparisonConfig::default();
        config.significance_level = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    #[allow(clippy::field_reassign_with_default)]
    fn test_invalid_exact_max_n() {
        let mut config = ComparisonConfig::default();
        config.exact_max_n = 64;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ComparisonConfig =
            toml::from_str("alternative = \"greater\"\nmin_sample_size = 3").unwrap();
        assert_eq!(config.alternative, Alternative::Greater);
        assert_eq!(config.min_sample_size, 3);
        assert_eq!(config.exact_max_n, 50);
    }
}
