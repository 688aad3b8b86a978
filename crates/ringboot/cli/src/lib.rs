//! Ring Boot CLI - run the boot sequence from the terminal.
//!
//! - `ringboot run` executes the four-phase boot and exits with its status
//! - `ringboot tree` renders a dependency tree without resolving it
//! - `ringboot config` prints the reference configuration as TOML

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{config, run, tree};
pub use error::{CliError, CliResult};

/// Ring Boot CLI application
#[derive(Parser)]
#[command(name = "ringboot")]
#[command(about = "Ring Boot - dependency-gated four-phase boot", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the boot sequence
    Run(run::RunArgs),

    /// Render a dependency tree
    Tree(tree::TreeArgs),

    /// Print the reference configuration
    Config,
}

/// Run using the current process arguments.
pub fn run() -> CliResult<i32> {
    run_with_args(std::env::args_os())
}

/// Run using the provided argument iterator, returning the exit status.
pub fn run_with_args<I, T>(args: I) -> CliResult<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init();

    match cli.command {
        Commands::Run(args) => run::execute(args, cli.output),
        Commands::Tree(args) => tree::execute(args, cli.output).map(|_| 0),
        Commands::Config => config::execute(cli.output).map(|_| 0),
    }
}
