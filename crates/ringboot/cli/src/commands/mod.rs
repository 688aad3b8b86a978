//! Subcommands and the file loaders they share.

pub mod config;
pub mod run;
pub mod tree;

use std::path::Path;

use ringboot_core::{BootConfig, DependencyGraph, NodeId, NodeSpec};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CliResult;

/// On-disk dependency tree: node specs plus extra requires edges.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TreeFile {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<(NodeId, NodeId)>,
}

/// The reference tree, or the JSON tree at `path`.
pub fn load_graph(path: Option<&Path>) -> CliResult<DependencyGraph> {
    match path {
        None => Ok(DependencyGraph::reference()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let file: TreeFile = serde_json::from_str(&text)?;
            debug!(
                path = %path.display(),
                nodes = file.nodes.len(),
                edges = file.edges.len(),
                "Loaded tree file"
            );
            Ok(DependencyGraph::build(&file.nodes, &file.edges)?)
        }
    }
}

/// The reference configuration, or the TOML config at `path`.
pub fn load_config(path: Option<&Path>) -> CliResult<BootConfig> {
    match path {
        None => Ok(BootConfig::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config: BootConfig = toml::from_str(&text)?;
            debug!(
                path = %path.display(),
                unit_count = config.unit_count,
                "Loaded config file"
            );
            Ok(config)
        }
    }
}
