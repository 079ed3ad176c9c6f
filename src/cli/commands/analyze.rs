//! `gsa analyze` command - scalar elementary-effects statistics
//!
//! Covers both result shapes: a whole-experiment objective value per run, or
//! a variable result file whose per-run totals form the observation vector.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::align::{align_objectives, align_total};
use crate::core::catalog::ParameterCatalog;
use crate::core::results::{ObjectiveResults, VariableResults};
use crate::core::sample::Sample;
use crate::core::sensitivity::{write_stats, SensitivityAnalyzer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultType {
    /// One OBJECTIVE value per run
    Objective,
    /// A variable result file, summed over the horizon per run
    Variable,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Parameter catalog CSV
    pub parameters: PathBuf,

    /// Normalized design matrix (headerless, comma-delimited)
    pub sample: PathBuf,

    /// Model result file (objective table or variable series)
    pub results: PathBuf,

    /// Output CSV for the per-parameter statistics
    pub output: PathBuf,

    /// Shape of the result file
    #[arg(long, value_enum)]
    pub result_type: ResultType,

    /// The sample carries physical values rather than [0,1] positions
    #[arg(long)]
    pub scaled: bool,

    /// Declared number of model runs (defaults to the sample row count)
    #[arg(long)]
    pub runs: Option<usize>,
}

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let catalog = ParameterCatalog::load(&args.parameters).into_diagnostic()?;
    let sample = Sample::load(&args.sample).into_diagnostic()?;
    let run_count = args.runs.unwrap_or_else(|| sample.run_count());

    let y = match args.result_type {
        ResultType::Objective => {
            let objectives = ObjectiveResults::load(&args.results).into_diagnostic()?;
            align_objectives(&objectives, run_count).into_diagnostic()?
        }
        ResultType::Variable => {
            let results = VariableResults::load(&args.results).into_diagnostic()?;
            align_total(&results, run_count).into_diagnostic()?
        }
    };

    let analyzer = SensitivityAnalyzer::new(&catalog, run_count, args.scaled);
    let stats = analyzer.analyze_scalar(&sample, &y).into_diagnostic()?;
    write_stats(&stats, &args.output).into_diagnostic()?;

    println!(
        "{} Sensitivity statistics for {} parameter groups written to {}",
        style("✓").green(),
        style(stats.len()).cyan(),
        style(args.output.display()).yellow()
    );
    Ok(())
}
