use anyhow::Result;
use benchstrata::aggregate::aggregate;
use benchstrata::binning::bin_datasets;
use benchstrata::cli::{BinArgs, Cli, Command, CompareArgs};
use benchstrata::comparison::{compare_against, compare_all};
use benchstrata::config::AnalysisConfig;
use benchstrata::ingest;
use benchstrata::record::{datasets_by_variant, reference_axis};
use benchstrata::report::{render_binning, render_comparisons, OutputFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber: trace level with --debug, RUST_LOG (default warn) otherwise
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file if given, defaults otherwise
fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    match &cli.config {
        Some(path) => AnalysisConfig::from_file(path),
        None => Ok(AnalysisConfig::default()),
    }
}

fn run_compare(args: &CompareArgs, mut config: AnalysisConfig, format: OutputFormat) -> Result<()> {
    if let Some(warmup) = args.warmup {
        config.aggregation.warmup_runs = warmup;
    }
    if let Some(alternative) = args.alternative {
        config.comparison.alternative = alternative;
    }
    if let Some(min_sample_size) = args.min_sample_size {
        config.comparison.min_sample_size = min_sample_size;
    }
    if let Some(policy) = args.low_sample {
        config.comparison.low_sample_policy = policy;
    }
    config.validate()?;

    let observations = ingest::load_observations(&args.observations)?;
    let aggregation = aggregate(&observations, config.aggregation.warmup_runs);
    let table = aggregation.by_variant();

    let report = match &args.baseline {
        Some(baseline) => compare_against(&table, baseline, &config.comparison)?,
        None => compare_all(&table, &config.comparison)?,
    };
    tracing::info!(
        "{} comparison(s), {} skipped",
        report.entries.len(),
        report.skipped().count()
    );

    let output = render_comparisons(
        &report,
        &aggregation.insufficient,
        config.comparison.significance_level,
        format,
    )?;
    print!("{}", output);
    Ok(())
}

fn run_bin(args: &BinArgs, mut config: AnalysisConfig, format: OutputFormat) -> Result<()> {
    if let Some(n_bins) = args.n_bins {
        config.binning.n_bins = n_bins;
    }
    if let Some(min_count) = args.min_count {
        config.binning.min_count = min_count;
    }
    config.validate()?;

    let rows = ingest::load_metric_rows(&args.metrics)?;
    let reference = reference_axis(&rows, args.x);
    let datasets = datasets_by_variant(&rows, args.y);
    let binning = bin_datasets(&reference, &datasets, &config.binning)?;

    let output = render_binning(&binning, args.x, args.y, format)?;
    print!("{}", output);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = load_config(&cli)?;
    match &cli.command {
        Command::Compare(args) => run_compare(args, config, cli.format),
        Command::Bin(args) => run_bin(args, config, cli.format),
    }
}
