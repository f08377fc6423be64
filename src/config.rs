//! Analysis configuration file (TOML)
//!
//! Every section and key is optional; missing values take their defaults.
//!
//! # Example benchstrata.toml
//!
//! ```toml
//! [aggregation]
//! warmup_runs = 2
//!
//! [comparison]
//! min_sample_size = 10
//! exact_max_n = 50
//! continuity_correction = false
//! alternative = "two-sided"
//! low_sample_policy = "warn"
//!
//! [binning]
//! n_bins = 10
//! min_count = 10
//! ```

use crate::binning::BinningConfig;
use crate::comparison::ComparisonConfig;
use crate::error::Result as AnalysisResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Warm-up handling for repeated runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Leading runs (by run index) discarded per (file, variant)
    pub warmup_runs: usize,
}

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub aggregation: AggregationConfig,
    pub comparison: ComparisonConfig,
    pub binning: BinningConfig,
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// # Example
    ///
    /// ```no_run
    /// use benchstrata::config::AnalysisConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_file("benchstrata.toml")?;
    /// println!("warm-up runs: {}", config.aggregation.warmup_runs);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalysisResult<()> {
        self.comparison.validate()?;
        self.binning.validate()
    }
}
