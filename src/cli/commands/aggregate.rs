//! `gsa aggregate` command - share and sum tables from raw production output

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::core::aggregate::{
    calc_share, calc_sum, load_production, write_records, AggregationGrid,
};

#[derive(Subcommand, Debug)]
pub enum AggregateCommands {
    /// Share of a technology group in total production per (year, country)
    Share(GroupArgs),

    /// Zero-filled raw sums over the country x technology x calendar grid
    Sum(GroupArgs),
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Raw production CSV (REGION,TECHNOLOGY,FUEL,YEAR,VALUE)
    pub input: PathBuf,

    /// Technology group codes, matched as substrings of the identifier
    #[arg(long, value_delimiter = ',', required = true)]
    pub techs: Vec<String>,

    /// Label for the aggregated technology group
    #[arg(long)]
    pub label: String,

    /// Output CSV path
    #[arg(long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub grid: GridArgs,
}

/// Calendar/country universe overrides (defaults match the Nordic model)
#[derive(Args, Debug)]
pub struct GridArgs {
    /// First calendar year
    #[arg(long, default_value_t = 2015)]
    pub first_year: i32,

    /// Last calendar year (inclusive)
    #[arg(long, default_value_t = 2060)]
    pub last_year: i32,

    /// Country universe, in output order
    #[arg(long, value_delimiter = ',', default_value = "DK,SE,FI,NO")]
    pub countries: Vec<String>,

    /// Region label stamped on every output row
    #[arg(long, default_value = "REGION1")]
    pub region: String,
}

impl From<&GridArgs> for AggregationGrid {
    fn from(args: &GridArgs) -> Self {
        Self {
            first_year: args.first_year,
            last_year: args.last_year,
            countries: args.countries.clone(),
            region: args.region.clone(),
            ..Default::default()
        }
    }
}

pub fn run(cmd: AggregateCommands) -> Result<()> {
    let (args, mode) = match &cmd {
        AggregateCommands::Share(args) => (args, "share"),
        AggregateCommands::Sum(args) => (args, "sum"),
    };

    let records = load_production(&args.input).into_diagnostic()?;
    let grid = AggregationGrid::from(&args.grid);

    let written = match &cmd {
        AggregateCommands::Share(args) => {
            let rows = calc_share(&records, &args.techs, &args.label, &grid);
            let count = rows.len();
            write_records(&rows, &args.output).into_diagnostic()?;
            count
        }
        AggregateCommands::Sum(args) => {
            let rows = calc_sum(&records, &args.techs, &args.label, &grid);
            let count = rows.len();
            write_records(&rows, &args.output).into_diagnostic()?;
            count
        }
    };

    println!(
        "{} Wrote {} {} rows for group '{}' to {}",
        style("✓").green(),
        style(written).cyan(),
        mode,
        style(&args.label).yellow(),
        style(args.output.display()).yellow()
    );
    Ok(())
}
