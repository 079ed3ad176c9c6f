//! `gsa expand` command - design matrix to per-run override files

use std::path::PathBuf;

use clap::Args;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::catalog::ParameterCatalog;
use crate::core::expand::{expand, write_override_files};
use crate::core::sample::Sample;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Parameter catalog CSV
    pub parameters: PathBuf,

    /// Normalized design matrix (headerless, comma-delimited)
    pub sample: PathBuf,

    /// Directory for the per-run override files
    #[arg(long, default_value = "model_runs")]
    pub output_dir: PathBuf,

    /// Run file prefix; files are named <prefix>_<ordinal>.csv
    #[arg(long, default_value = "model_run")]
    pub prefix: String,
}

pub fn run(args: ExpandArgs) -> Result<()> {
    let catalog = ParameterCatalog::load(&args.parameters).into_diagnostic()?;
    let sample = Sample::load(&args.sample).into_diagnostic()?;

    let tables = expand(&sample, &catalog).into_diagnostic()?;
    let paths = write_override_files(&tables, &args.output_dir, &args.prefix).into_diagnostic()?;

    println!(
        "{} Expanded {} parameters into {} override files in {}",
        style("✓").green(),
        style(catalog.len()).cyan(),
        style(paths.len()).cyan(),
        style(args.output_dir.display()).yellow()
    );
    Ok(())
}
