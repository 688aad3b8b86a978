//! Error types for the ring boot core.

use thiserror::Error;

use crate::types::NodeId;

/// Errors that can occur while building, resolving or running a boot.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BootError {
    /// A node was reached again while its own dependencies were still
    /// being resolved.
    #[error("circular dependency detected at {node}")]
    CycleDetected { node: NodeId },

    /// Resolution was requested on a graph without a root.
    #[error("dependency graph has no root")]
    MissingRoot,

    /// Allocation addressed a unit outside the pool.
    #[error("invalid unit index {index} for pool of {size} units")]
    InvalidUnitIndex { index: usize, size: usize },

    /// The same node id was declared twice.
    #[error("duplicate node: {0}")]
    DuplicateNode(NodeId),

    /// A parent or edge referenced an undeclared node.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    /// More than one node was declared without a parent.
    #[error("multiple roots declared: {0:?}")]
    MultipleRoots(Vec<NodeId>),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BootError {
    /// Whether the error aborts a run in progress.
    ///
    /// Construction errors never reach a run, every other kind does.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self,
            Self::CycleDetected { .. }
                | Self::MissingRoot
                | Self::InvalidUnitIndex { .. }
                | Self::Configuration(_)
        )
    }
}

/// Result type for ring boot operations.
pub type BootResult<T> = Result<T, BootError>;
