//! Dependency tree rendering

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::commands::load_graph;
use crate::error::CliResult;
use crate::output::OutputFormat;

/// Arguments of `ringboot tree`
#[derive(Args)]
pub struct TreeArgs {
    /// JSON tree file (defaults to the reference tree)
    #[arg(short, long)]
    pub tree: Option<PathBuf>,
}

/// Render the tree without resolving it.
pub fn execute(args: TreeArgs, format: OutputFormat) -> CliResult<()> {
    let graph = load_graph(args.tree.as_deref())?;

    match format {
        OutputFormat::Json => {
            let nodes: Vec<_> = graph
                .nodes()
                .map(|node| {
                    serde_json::json!({
                        "id": node.id(),
                        "level": node.level(),
                        "label": node.label(),
                        "requires": graph.dependencies_of(node.id()).unwrap_or_default(),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "root": graph.root().map(|r| r.id()),
                "node_count": graph.node_count(),
                "max_depth": graph.max_depth(),
                "nodes": nodes,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            println!("{}", "Dependency Tree".bold().cyan());
            println!("{}", "=".repeat(50));
            print!("{}", graph.render_tree());
            println!();
            println!(
                "{}: {}  {}: {}",
                "Nodes".bold(),
                graph.node_count(),
                "Depth".bold(),
                graph.max_depth()
            );
        }
    }
    Ok(())
}
