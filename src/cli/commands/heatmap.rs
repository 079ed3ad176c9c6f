//! `gsa heatmap` command - per-year sensitivity matrix for a variable result

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::catalog::ParameterCatalog;
use crate::core::heatmap;
use crate::core::results::{MetricKind, VariableResults};
use crate::core::sample::Sample;
use crate::core::sensitivity::SensitivityAnalyzer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Metric {
    /// Fractional share (the VALUE column)
    Share,
    /// Raw summed quantity (absolute_production when present)
    Absolute,
}

impl From<Metric> for MetricKind {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Share => MetricKind::Share,
            Metric::Absolute => MetricKind::Absolute,
        }
    }
}

#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// Parameter catalog CSV
    pub parameters: PathBuf,

    /// Normalized design matrix (headerless, comma-delimited)
    pub sample: PathBuf,

    /// Variable result file across all runs
    pub results: PathBuf,

    /// Output CSV: parameter rows x year columns of mu_star
    pub output: PathBuf,

    /// Observation metric; defaults to share when the result file carries an
    /// absolute_production column, raw quantity otherwise
    #[arg(long, value_enum)]
    pub metric: Option<Metric>,

    /// The sample carries physical values rather than [0,1] positions
    #[arg(long)]
    pub scaled: bool,

    /// Declared number of model runs (defaults to the sample row count)
    #[arg(long)]
    pub runs: Option<usize>,
}

pub fn run(args: HeatmapArgs) -> Result<()> {
    let catalog = ParameterCatalog::load(&args.parameters).into_diagnostic()?;
    let sample = Sample::load(&args.sample).into_diagnostic()?;
    let mut results = VariableResults::load(&args.results).into_diagnostic()?;
    if let Some(metric) = args.metric {
        results = results.with_kind(metric.into());
    }
    let run_count = args.runs.unwrap_or_else(|| sample.run_count());

    let analyzer = SensitivityAnalyzer::new(&catalog, run_count, args.scaled);
    let yearly = analyzer.analyze_years(&sample, &results).into_diagnostic()?;

    for failure in &yearly.failures {
        eprintln!(
            "{} year {}: {} (column zeroed)",
            style("warning:").yellow().bold(),
            failure.year,
            failure.reason
        );
    }

    let matrix = heatmap::shape(&yearly);
    heatmap::write_csv(&matrix, &args.output).into_diagnostic()?;

    println!(
        "{} Heatmap matrix ({} parameters x {} years) written to {}",
        style("✓").green(),
        style(matrix.row_labels.len()).cyan(),
        style(matrix.years.len()).cyan(),
        style(args.output.display()).yellow()
    );
    Ok(())
}
