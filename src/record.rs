//! Canonical record model for benchmark observations
//!
//! Records are typed structs rather than string-keyed columns, so a missing
//! field is caught when the record is built instead of at some later lookup.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One benchmark run of one variant on one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub file_id: String,
    pub variant_id: String,
    pub run_index: u32,
    /// Measured execution time (any consistent unit)
    pub runtime: f64,
}

impl Observation {
    pub fn new(
        file_id: impl Into<String>,
        variant_id: impl Into<String>,
        run_index: u32,
        runtime: f64,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            variant_id: variant_id.into(),
            run_index,
            runtime,
        }
    }
}

/// Median runtime of one (file, variant) pair after warm-up exclusion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEstimate {
    pub file_id: String,
    pub variant_id: String,
    pub value: f64,
}

/// Per-file quality and timing metrics for one variant
///
/// Fields are private: derived quantities are computed from the stored raw
/// fields on every access and cannot drift from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    file_id: String,
    variant_id: String,
    ast_size: f64,
    matches_before: f64,
    matches_after: f64,
    script_len_before: f64,
    script_len_after: f64,
    time_estimate: f64,
    time_lower: f64,
    time_upper: f64,
}

/// Raw fields of a [`MetricRow`], as handed over by an ingestion layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMetricRow {
    #[serde(rename = "file")]
    pub file_id: String,
    #[serde(rename = "variant")]
    pub variant_id: String,
    pub ast_size: f64,
    pub matches_before: f64,
    pub matches_after: f64,
    pub script_len_before: f64,
    pub script_len_after: f64,
    pub time_estimate: f64,
    pub time_lower: f64,
    pub time_upper: f64,
}

impl MetricRow {
    /// Validate raw fields and build a row
    ///
    /// Every numeric field must be finite and non-negative, and the time
    /// confidence bounds must bracket the estimate.
    pub fn new(raw: RawMetricRow) -> Result<Self> {
        let numeric = [
            ("ast_size", raw.ast_size),
            ("matches_before", raw.matches_before),
            ("matches_after", raw.matches_after),
            ("script_len_before", raw.script_len_before),
            ("script_len_after", raw.script_len_after),
            ("time_estimate", raw.time_estimate),
            ("time_lower", raw.time_lower),
            ("time_upper", raw.time_upper),
        ];
        for (name, value) in numeric {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::InvalidValue(format!(
                    "{} = {} for file '{}' / variant '{}'",
                    name, value, raw.file_id, raw.variant_id
                )));
            }
        }

        if raw.time_lower > raw.time_estimate || raw.time_estimate > raw.time_upper {
            return Err(AnalysisError::InvalidValue(format!(
                "time bounds [{}, {}] do not bracket estimate {} for file '{}' / variant '{}'",
                raw.time_lower, raw.time_upper, raw.time_estimate, raw.file_id, raw.variant_id
            )));
        }

        Ok(Self {
            file_id: raw.file_id,
            variant_id: raw.variant_id,
            ast_size: raw.ast_size,
            matches_before: raw.matches_before,
            matches_after: raw.matches_after,
            script_len_before: raw.script_len_before,
            script_len_after: raw.script_len_after,
            time_estimate: raw.time_estimate,
            time_lower: raw.time_lower,
            time_upper: raw.time_upper,
        })
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn variant_id(&self) -> &str {
        &self.variant_id
    }

    /// Fractional edit-script shrinkage: `(before - after) / before`
    ///
    /// Zero when the script was already empty.
    pub fn script_length_reduction(&self) -> f64 {
        if self.script_len_before == 0.0 {
            0.0
        } else {
            (self.script_len_before - self.script_len_after) / self.script_len_before
        }
    }

    /// Additional matches found after post-processing
    pub fn matches_gain(&self) -> f64 {
        self.matches_after - self.matches_before
    }

    /// Read any raw or derived field
    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::AstSize => self.ast_size,
            MetricField::MatchesBefore => self.matches_before,
            MetricField::MatchesAfter => self.matches_after,
            MetricField::MatchesGain => self.matches_gain(),
            MetricField::ScriptLenBefore => self.script_len_before,
            MetricField::ScriptLenAfter => self.script_len_after,
            MetricField::ScriptLengthReduction => self.script_length_reduction(),
            MetricField::TimeEstimate => self.time_estimate,
            MetricField::TimeLower => self.time_lower,
            MetricField::TimeUpper => self.time_upper,
        }
    }
}

/// Typed selector for a [`MetricRow`] field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MetricField {
    AstSize,
    MatchesBefore,
    MatchesAfter,
    MatchesGain,
    ScriptLenBefore,
    ScriptLenAfter,
    ScriptLengthReduction,
    TimeEstimate,
    TimeLower,
    TimeUpper,
}

impl MetricField {
    pub fn name(&self) -> &'static str {
        match self {
            MetricField::AstSize => "ast_size",
            MetricField::MatchesBefore => "matches_before",
            MetricField::MatchesAfter => "matches_after",
            MetricField::MatchesGain => "matches_gain",
            MetricField::ScriptLenBefore => "script_len_before",
            MetricField::ScriptLenAfter => "script_len_after",
            MetricField::ScriptLengthReduction => "script_length_reduction",
            MetricField::TimeEstimate => "time_estimate",
            MetricField::TimeLower => "time_lower",
            MetricField::TimeUpper => "time_upper",
        }
    }
}

/// Per-file x-axis taken from the metric table
///
/// The first row seen for a file wins; size metrics are properties of the
/// input file and normally agree across variants.
pub fn reference_axis(rows: &[MetricRow], field: MetricField) -> BTreeMap<String, f64> {
    let mut axis = BTreeMap::new();
    for row in rows {
        let x = row.get(field);
        match axis.get(row.file_id()) {
            None => {
                axis.insert(row.file_id().to_string(), x);
            }
            Some(&seen) if seen != x => {
                tracing::debug!(
                    "{} of '{}' differs across variants ({} vs {}), keeping the first",
                    field.name(),
                    row.file_id(),
                    seen,
                    x
                );
            }
            Some(_) => {}
        }
    }
    axis
}

/// One dataset per variant: `variant -> file -> field value`
pub fn datasets_by_variant(
    rows: &[MetricRow],
    field: MetricField,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut datasets: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for row in rows {
        datasets
            .entry(row.variant_id().to_string())
            .or_default()
            .insert(row.file_id().to_string(), row.get(field));
    }
    datasets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawMetricRow {
        RawMetricRow {
            file_id: "Foo.java".to_string(),
            variant_id: "hyperast".to_string(),
            ast_size: 1200.0,
            matches_before: 80.0,
            matches_after: 95.0,
            script_len_before: 40.0,
            script_len_after: 30.0,
            time_estimate: 12.0,
            time_lower: 11.0,
            time_upper: 13.5,
        }
    }

    #[test]
    fn test_derived_fields() {
        let row = MetricRow::new(raw()).unwrap();
        assert!((row.script_length_reduction() - 0.25).abs() < 1e-12);
        assert_eq!(row.matches_gain(), 15.0);
        assert_eq!(row.get(MetricField::AstSize), 1200.0);
        assert_eq!(
            row.get(MetricField::ScriptLengthReduction),
            row.script_length_reduction()
        );
    }

    #[test]
    fn test_empty_script_has_zero_reduction() {
        let mut r = raw();
        r.script_len_before = 0.0;
        r.script_len_after = 0.0;
        let row = MetricRow::new(r).unwrap();
        assert_eq!(row.script_length_reduction(), 0.0);
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut r = raw();
        r.ast_size = f64::NAN;
        assert!(matches!(
            MetricRow::new(r),
            Err(AnalysisError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_rejects_bounds_not_bracketing_estimate() {
        let mut r = raw();
        r.time_upper = 10.0;
        assert!(MetricRow::new(r).is_err());
    }

    #[test]
    fn test_reference_axis_and_datasets() {
        let mut other = raw();
        other.variant_id = "gumtree".to_string();
        other.time_estimate = 30.0;
        other.time_upper = 31.0;
        let mut second = raw();
        second.file_id = "Bar.java".to_string();
        second.ast_size = 90.0;

        let rows: Vec<MetricRow> = [raw(), other, second]
            .into_iter()
            .map(|r| MetricRow::new(r).unwrap())
            .collect();

        let axis = reference_axis(&rows, MetricField::AstSize);
        assert_eq!(axis.len(), 2);
        assert_eq!(axis["Foo.java"], 1200.0);
        assert_eq!(axis["Bar.java"], 90.0);

        let datasets = datasets_by_variant(&rows, MetricField::TimeEstimate);
        assert_eq!(datasets["gumtree"]["Foo.java"], 30.0);
        assert_eq!(datasets["hyperast"].len(), 2);
    }
}
