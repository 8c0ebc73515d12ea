// afniwrap-cli/src/main.rs
//
// Binary entry point for the afniwrap CLI.
//
// Responsibilities:
// - Initializing logging (env_logger, RUST_LOG controlled, default info).
// - Parsing command-line arguments.
// - Dispatching to the subcommand implementations.
// - Mapping errors to a nonzero exit code.

use std::process;

use clap::Parser;

use afniwrap_cli::cli::{Cli, Commands};
use afniwrap_cli::commands::{run_deconvolve, run_remlfit};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Deconvolve(args) => run_deconvolve(args, cli.dry_run),
        Commands::Remlfit(args) => run_remlfit(args, cli.dry_run),
    };

    if let Err(e) = result {
        log::error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
