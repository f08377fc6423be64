// Configuration for adaptive log-binning

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// Bin count target and tail population floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningConfig {
    /// Target number of log-spaced bins before tail merging and rounding
    pub n_bins: usize,

    /// Minimum reference points required in the last bin
    pub min_count: usize,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            n_bins: 10,
            min_count: 10,
        }
    }
}

impl BinningConfig {
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == 0 {
            return Err(AnalysisError::InvalidConfig(
                "n_bins must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BinningConfig::default();
        assert_eq!(config.n_bins, 10);
        assert_eq!(config.min_count, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_bins_rejected() {
        let config = BinningConfig {
            n_bins: 0,
            ..BinningConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
