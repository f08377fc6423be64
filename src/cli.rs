//! CLI argument parsing for benchstrata

use crate::comparison::{Alternative, LowSamplePolicy};
use crate::record::MetricField;
use crate::report::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "benchstrata")]
#[command(version)]
#[command(
    about = "Paired signed-rank comparison and size-stratified summaries of benchmark runs",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Analysis configuration file (TOML); flags override its values
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compare variants with the Wilcoxon signed-rank test
    Compare(CompareArgs),
    /// Stratify a metric into adaptive log bins of a size metric
    Bin(BinArgs),
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Observations CSV with columns file,variant,run,runtime
    #[arg(short, long, value_name = "CSV")]
    pub observations: PathBuf,

    /// Leading runs discarded per (file, variant)
    #[arg(short, long, value_name = "N")]
    pub warmup: Option<usize>,

    /// Compare every variant against this one instead of all pairs
    #[arg(short, long, value_name = "VARIANT")]
    pub baseline: Option<String>,

    /// Alternative hypothesis
    #[arg(long, value_enum)]
    pub alternative: Option<Alternative>,

    /// Non-tied pairs below which a comparison is flagged
    #[arg(long, value_name = "N")]
    pub min_sample_size: Option<usize>,

    /// Flag or skip comparisons under the minimum sample size
    #[arg(long, value_enum)]
    pub low_sample: Option<LowSamplePolicy>,
}

#[derive(Args, Debug)]
pub struct BinArgs {
    /// Metrics CSV with one row per (file, variant)
    #[arg(short, long, value_name = "CSV")]
    pub metrics: PathBuf,

    /// Reference field for the bin axis
    #[arg(short, long, value_enum, default_value = "ast-size")]
    pub x: MetricField,

    /// Field summarized within each bin
    #[arg(short, long, value_enum)]
    pub y: MetricField,

    /// Target bin count before tail merging
    #[arg(long, value_name = "N")]
    pub n_bins: Option<usize>,

    /// Minimum reference points in the last bin
    #[arg(long, value_name = "N")]
    pub min_count: Option<usize>,
}
