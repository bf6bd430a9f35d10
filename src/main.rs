//! segstore CLI
//!
//! Command-line interface for the segstore segment store.

use anyhow::Result;
use clap::Parser;
use segstore::cli::{commands, context::CliContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    CliContext::set(CliContext {
        verbose: cli.verbose,
        quiet: cli.quiet,
        yes: cli.yes,
        store: cli.store,
        config: cli.config,
    });

    // Execute the command
    match cli.command {
        Commands::Upload { file, path, name, json } => {
            commands::upload::execute(file, path, name, json)
        },
        Commands::Download { file, segment, output } => {
            commands::download::execute(file, segment, output)
        },
        Commands::List { json } => commands::list::execute(json),
        Commands::Delete { file } => commands::delete::execute(file),
        Commands::Prove { file, segment, output, no_verify } => {
            commands::prove::execute(file, segment, output, no_verify)
        },
        Commands::Verify { proof, root, steps } => commands::verify::execute(proof, root, steps),
        Commands::Root { file } => commands::root::execute(file),
        Commands::Config { action } => commands::config::execute(action),
    }
}
