//! Rendering comparison reports and stratified summaries
//!
//! Text for terminals, JSON for machine parsing and CSV for spreadsheets or
//! plotting scripts. Skipped comparisons and unbinned files appear in every
//! format.

use crate::binning::Binning;
use crate::comparison::{ComparisonReport, EntryStatus, PValueMethod};
use crate::error::AnalysisError;
use crate::record::MetricField;
use anyhow::{Context, Result};
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text tables (default)
    #[default]
    Text,
    /// JSON for machine parsing
    Json,
    /// CSV for spreadsheet analysis and plotting
    Csv,
}

fn method_name(method: PValueMethod) -> &'static str {
    match method {
        PValueMethod::Exact => "exact",
        PValueMethod::Normal => "normal",
    }
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

#[derive(Serialize)]
struct ComparisonDocument<'a> {
    significance_level: f64,
    comparisons: &'a ComparisonReport,
    insufficient_data: Vec<String>,
}

/// Render a comparison report
///
/// `insufficient` lists the (file, variant) pairs the aggregator could not
/// estimate, so readers can see what was left out of every comparison.
pub fn render_comparisons(
    report: &ComparisonReport,
    insufficient: &[AnalysisError],
    alpha: f64,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(comparisons_text(report, insufficient, alpha)),
        OutputFormat::Json => {
            let doc = ComparisonDocument {
                significance_level: alpha,
                comparisons: report,
                insufficient_data: insufficient.iter().map(ToString::to_string).collect(),
            };
            serde_json::to_string_pretty(&doc).context("Failed to serialize comparisons")
        }
        OutputFormat::Csv => comparisons_csv(report),
    }
}

fn comparisons_text(report: &ComparisonReport, insufficient: &[AnalysisError], alpha: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<16} {:<16} {:>5} {:>10} {:>10} {:>7} {:>10} {:>7} {:<7} {}\n",
        "variant_a", "variant_b", "n", "W+", "W-", "norm_W", "p_value", "r_rb", "method", "note"
    ));
    out.push_str(&format!("{}\n", "-".repeat(104)));

    for entry in &report.entries {
        match &entry.status {
            EntryStatus::Computed { result, low_sample } => {
                let mut notes = Vec::new();
                if result.is_significant(alpha) {
                    notes.push("significant".to_string());
                }
                if *low_sample {
                    notes.push("LOW SAMPLE".to_string());
                }
                out.push_str(&format!(
                    "{:<16} {:<16} {:>5} {:>10.1} {:>10.1} {:>7.3} {:>10.3e} {:>7.3} {:<7} {}\n",
                    result.variant_a,
                    result.variant_b,
                    result.n,
                    result.w_plus,
                    result.w_minus,
                    result.normalized_w,
                    result.p_value,
                    result.rank_biserial_correlation,
                    method_name(result.method),
                    notes.join(", ")
                ));
            }
            EntryStatus::Skipped { kind, reason } => {
                out.push_str(&format!(
                    "{:<16} {:<16} SKIPPED ({}): {}\n",
                    entry.variant_a, entry.variant_b, kind, reason
                ));
            }
        }
    }

    if !insufficient.is_empty() {
        out.push_str(&format!(
            "\n{} (file, variant) pair(s) without usable runs:\n",
            insufficient.len()
        ));
        for e in insufficient {
            out.push_str(&format!("  - {}\n", e));
        }
    }
    out
}

fn comparisons_csv(report: &ComparisonReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "variant_a",
        "variant_b",
        "status",
        "common",
        "n",
        "w_statistic",
        "w_plus",
        "w_minus",
        "normalized_w",
        "p_value",
        "z_score",
        "method",
        "rank_biserial_correlation",
        "low_sample",
        "reason",
    ])?;

    for entry in &report.entries {
        let record = match &entry.status {
            EntryStatus::Computed { result, low_sample } => vec![
                entry.variant_a.clone(),
                entry.variant_b.clone(),
                "computed".to_string(),
                result.common.to_string(),
                result.n.to_string(),
                result.w_statistic.to_string(),
                result.w_plus.to_string(),
                result.w_minus.to_string(),
                result.normalized_w.to_string(),
                result.p_value.to_string(),
                result.z_score.map(|z| z.to_string()).unwrap_or_default(),
                method_name(result.method).to_string(),
                result.rank_biserial_correlation.to_string(),
                low_sample.to_string(),
                String::new(),
            ],
            EntryStatus::Skipped { kind, reason } => {
                let mut record = vec![
                    entry.variant_a.clone(),
                    entry.variant_b.clone(),
                    format!("skipped:{}", kind),
                ];
                record.extend(std::iter::repeat(String::new()).take(11));
                record.push(reason.clone());
                record
            }
        };
        writer.write_record(&record)?;
    }
    finish_csv(writer)
}

#[derive(Serialize)]
struct BinningDocument<'a> {
    x: &'static str,
    y: &'static str,
    edges: &'a [f64],
    summaries: Vec<crate::binning::BinSummary>,
    unbinned: Vec<(&'a str, &'a [String])>,
}

/// Render per-bin summaries of every dataset
pub fn render_binning(
    binning: &Binning,
    x: MetricField,
    y: MetricField,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(binning_text(binning, x, y)),
        OutputFormat::Json => {
            let doc = BinningDocument {
                x: x.name(),
                y: y.name(),
                edges: binning.spec.edges(),
                summaries: binning.summaries(),
                unbinned: binning
                    .datasets
                    .iter()
                    .filter(|d| !d.unbinned.is_empty())
                    .map(|d| (d.label.as_str(), d.unbinned.as_slice()))
                    .collect(),
            };
            serde_json::to_string_pretty(&doc).context("Failed to serialize binning")
        }
        OutputFormat::Csv => binning_csv(binning),
    }
}

fn binning_text(binning: &Binning, x: MetricField, y: MetricField) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} by {} ({} bin(s), edges: {:?})\n\n",
        y.name(),
        x.name(),
        binning.spec.bin_count(),
        binning.spec.edges()
    ));
    out.push_str(&format!(
        "{:<16} {:<20} {:>6} {:>12} {:>12} {:>12} {:>12}\n",
        "dataset", "bin", "count", "q1", "median", "q3", "mean"
    ));
    out.push_str(&format!("{}\n", "-".repeat(96)));

    for summary in binning.summaries() {
        match &summary.summary {
            Some(s) => out.push_str(&format!(
                "{:<16} {:<20} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4}\n",
                summary.label, summary.interval, s.count, s.q1, s.median, s.q3, s.mean
            )),
            None => out.push_str(&format!(
                "{:<16} {:<20} {:>6} (empty)\n",
                summary.label, summary.interval, 0
            )),
        }
    }

    for dataset in binning.datasets.iter().filter(|d| !d.unbinned.is_empty()) {
        out.push_str(&format!(
            "\n{}: {} file(s) not binned: {}\n",
            dataset.label,
            dataset.unbinned.len(),
            dataset.unbinned.join(", ")
        ));
    }
    out
}

fn binning_csv(binning: &Binning) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "dataset", "bin_index", "interval", "count", "mean", "q1", "median", "q3", "min", "max",
    ])?;

    for summary in binning.summaries() {
        let mut record = vec![
            summary.label.clone(),
            summary.bin_index.to_string(),
            summary.interval.clone(),
        ];
        match &summary.summary {
            Some(s) => record.extend([
                s.count.to_string(),
                s.mean.to_string(),
                s.q1.to_string(),
                s.median.to_string(),
                s.q3.to_string(),
                s.min.to_string(),
                s.max.to_string(),
            ]),
            None => {
                record.push("0".to_string());
                record.extend(std::iter::repeat(String::new()).take(6));
            }
        }
        writer.write_record(&record)?;
    }
    finish_csv(writer)
}
