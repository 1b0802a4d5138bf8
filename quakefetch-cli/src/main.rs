//! QuakeFetch CLI - command-line interface
//!
//! This binary provides a command-line interface to the QuakeFetch library:
//! read an event catalog, plan request windows, and optionally download the
//! waveforms.

mod catalog;
mod commands;
mod error;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use commands::{fetch, plan};

#[derive(Parser)]
#[command(
    name = "quakefetch",
    version,
    about = "Plan and fetch event-based seismic waveform datasets from FDSN data centers"
)]
struct Cli {
    /// Print debug output.
    #[arg(long, global = true)]
    verbose: bool,

    /// Only print errors.
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the request plan for each catalog event without downloading.
    Plan(plan::PlanArgs),
    /// Plan and download waveforms for each catalog event.
    Fetch(fetch::FetchArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Plan(args) => plan::run(args),
        Command::Fetch(args) => fetch::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing subscriber on stderr.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
