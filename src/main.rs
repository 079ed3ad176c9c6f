use clap::Parser;
use miette::Result;

use gsa::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Expand(args) => gsa::cli::commands::expand::run(args),
        Commands::Aggregate(cmd) => gsa::cli::commands::aggregate::run(cmd),
        Commands::Analyze(args) => gsa::cli::commands::analyze::run(args),
        Commands::Heatmap(args) => gsa::cli::commands::heatmap::run(args),
    }
}
