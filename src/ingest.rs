//! CSV loading of observations and metric rows
//!
//! Each loader returns an owned table. Headers are matched by name, extra
//! columns are ignored and a missing or malformed field is reported with the
//! file path and record line.

use crate::record::{MetricRow, Observation, RawMetricRow};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One row of an observations CSV: `file,variant,run,runtime`
#[derive(Debug, Deserialize)]
struct ObservationRecord {
    file: String,
    variant: String,
    run: u32,
    runtime: f64,
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn line_of(err: &csv::Error) -> String {
    err.position()
        .map(|p| format!("line {}", p.line()))
        .unwrap_or_else(|| "unknown line".to_string())
}

/// Parse observations from any reader
pub fn read_observations<R: Read>(input: R, source: &str) -> Result<Vec<Observation>> {
    let mut rdr = reader(input);
    let mut observations = Vec::new();

    for record in rdr.deserialize::<ObservationRecord>() {
        let record = record.map_err(|e| {
            let line = line_of(&e);
            anyhow::Error::new(e).context(format!("Malformed observation in {} at {}", source, line))
        })?;
        if !record.runtime.is_finite() || record.runtime < 0.0 {
            bail!(
                "Invalid runtime {} for {}/{} run {} in {}",
                record.runtime,
                record.file,
                record.variant,
                record.run,
                source
            );
        }
        observations.push(Observation::new(
            record.file,
            record.variant,
            record.run,
            record.runtime,
        ));
    }

    if observations.is_empty() {
        bail!("No observations in {}", source);
    }
    tracing::debug!("Loaded {} observation(s) from {}", observations.len(), source);
    Ok(observations)
}

/// Load observations from a CSV file
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_observations(file, &path.display().to_string())
}

/// Parse validated metric rows from any reader
pub fn read_metric_rows<R: Read>(input: R, source: &str) -> Result<Vec<MetricRow>> {
    let mut rdr = reader(input);
    let mut rows = Vec::new();

    for record in rdr.deserialize::<RawMetricRow>() {
        let raw = record.map_err(|e| {
            let line = line_of(&e);
            anyhow::Error::new(e).context(format!("Malformed metric row in {} at {}", source, line))
        })?;
        let row = MetricRow::new(raw).with_context(|| format!("Invalid metric row in {}", source))?;
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("No metric rows in {}", source);
    }
    tracing::debug!("Loaded {} metric row(s) from {}", rows.len(), source);
    Ok(rows)
}

/// Load metric rows from a CSV file
pub fn load_metric_rows(path: &Path) -> Result<Vec<MetricRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    read_metric_rows(file, &path.display().to_string())
}
