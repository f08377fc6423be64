// Batch comparisons across every variant in an estimate table
//
// Every requested pair ends up in the report, either with its result or
// with the reason it was skipped.

use crate::aggregate::EstimateTable;
use crate::comparison::comparator::{compare_variants, ComparisonResult};
use crate::comparison::config::ComparisonConfig;
use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Status of one requested comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Computed {
        result: ComparisonResult,
        low_sample: bool,
    },
    Skipped {
        kind: &'static str,
        reason: String,
    },
}

/// One requested (A, B) comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub variant_a: String,
    pub variant_b: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

impl ReportEntry {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match &self.status {
            EntryStatus::Computed { result, .. } => Some(result),
            EntryStatus::Skipped { .. } => None,
        }
    }
}

/// All comparisons requested in one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub entries: Vec<ReportEntry>,
}

impl ComparisonReport {
    pub fn computed(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.entries.iter().filter_map(ReportEntry::result)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, EntryStatus::Skipped { .. }))
    }
}

fn run_entry(
    table: &EstimateTable,
    variant_a: &str,
    variant_b: &str,
    config: &ComparisonConfig,
) -> ReportEntry {
    let status = match (table.variant(variant_a), table.variant(variant_b)) {
        (Some(a), Some(b)) => match compare_variants(variant_a, a, variant_b, b, config) {
            Ok(outcome) => EntryStatus::Computed {
                low_sample: outcome.is_low_sample(),
                result: outcome.into_result(),
            },
            Err(e) => {
                tracing::warn!("Skipping {} vs {}: {}", variant_a, variant_b, e);
                EntryStatus::Skipped {
                    kind: e.kind(),
                    reason: e.to_string(),
                }
            }
        },
        _ => {
            let e = AnalysisError::NoOverlap {
                variant_a: variant_a.to_string(),
                variant_b: variant_b.to_string(),
            };
            EntryStatus::Skipped {
                kind: e.kind(),
                reason: e.to_string(),
            }
        }
    };

    ReportEntry {
        variant_a: variant_a.to_string(),
        variant_b: variant_b.to_string(),
        status,
    }
}

fn ensure_estimates(table: &EstimateTable) -> Result<()> {
    if table.is_empty() {
        return Err(AnalysisError::InvalidValue(
            "no point estimates to compare".to_string(),
        ));
    }
    Ok(())
}

/// Compare every unordered pair of variants, A < B lexicographically
///
/// # Errors
/// `InvalidValue` when the table holds no estimates.
pub fn compare_all(table: &EstimateTable, config: &ComparisonConfig) -> Result<ComparisonReport> {
    config.validate()?;
    ensure_estimates(table)?;

    let variants: Vec<&str> = table.variant_ids().collect();
    let mut report = ComparisonReport::default();
    for (i, a) in variants.iter().enumerate() {
        for b in &variants[i + 1..] {
            report.entries.push(run_entry(table, a, b, config));
        }
    }
    Ok(report)
}

/// Compare every other variant (as A) against `baseline` (as B)
///
/// # Errors
/// - `InvalidValue` when the table holds no estimates
/// - `InvalidConfig` when the baseline variant is not in the table
pub fn compare_against(
    table: &EstimateTable,
    baseline: &str,
    config: &ComparisonConfig,
) -> Result<ComparisonReport> {
    config.validate()?;
    ensure_estimates(table)?;
    if table.variant(baseline).is_none() {
        return Err(AnalysisError::InvalidConfig(format!(
            "baseline variant '{}' has no estimates",
            baseline
        )));
    }

    let mut report = ComparisonReport::default();
    for variant in table.variant_ids().filter(|v| *v != baseline) {
        report
            .entries
            .push(run_entry(table, variant, baseline, config));
    }
    Ok(report)
}
