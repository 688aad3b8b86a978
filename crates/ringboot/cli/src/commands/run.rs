//! Boot sequence execution

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use ringboot_core::{BootOrchestrator, MemorySink, StdoutSink};
use tracing::{info, warn};

use crate::commands::{load_config, load_graph};
use crate::error::CliResult;
use crate::output::{halt_line, verdict, OutputFormat};

/// Arguments of `ringboot run`
#[derive(Args)]
pub struct RunArgs {
    /// TOML configuration file (defaults to the reference plan)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON tree file (defaults to the reference tree)
    #[arg(short, long)]
    pub tree: Option<PathBuf>,

    /// Pool size, overriding the configuration
    #[arg(short, long, env = "RINGBOOT_UNITS")]
    pub units: Option<usize>,
}

/// Run the boot and return its process exit status.
pub fn execute(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(units) = args.units {
        info!(units, "Overriding configured pool size");
        config.unit_count = units;
    }
    if let Err(e) = config.validate() {
        warn!(error = %e, "Rejected boot configuration");
        return Err(e.into());
    }
    let graph = load_graph(args.tree.as_deref())?;
    info!(
        nodes = graph.node_count(),
        units = config.unit_count,
        format = ?format,
        "Starting boot run"
    );

    let orchestrator = BootOrchestrator::new(graph, config);
    let report = match format {
        OutputFormat::Json => {
            let report = orchestrator.run(&mut MemorySink::new());
            println!("{}", serde_json::to_string_pretty(&report)?);
            report
        }
        OutputFormat::Table => {
            let report = orchestrator.run(&mut StdoutSink);
            println!();
            println!(
                "{}: {}  {}: {}/{}",
                "Result".bold(),
                verdict(report.result),
                "Resolved".bold(),
                report.resolved_count,
                report.graph.node_count()
            );
            println!("{}", halt_line(report.halt_code));
            report
        }
    };

    info!(run_id = %report.run_id, result = %report.result, "Boot run complete");
    Ok(report.exit_code())
}
