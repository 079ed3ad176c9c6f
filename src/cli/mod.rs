//! CLI module - argument parsing and command dispatch

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "gsa",
    version,
    about = "Elementary-effects sensitivity analysis for energy model experiments"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Expand a normalized design matrix into per-run model input overrides
    Expand(commands::expand::ExpandArgs),

    /// Aggregate raw per-technology output into share or sum tables
    #[command(subcommand)]
    Aggregate(commands::aggregate::AggregateCommands),

    /// Run elementary-effects analysis for a scalar or variable result
    Analyze(commands::analyze::AnalyzeArgs),

    /// Build the per-year parameter x year sensitivity matrix for a heatmap
    Heatmap(commands::heatmap::HeatmapArgs),
}
