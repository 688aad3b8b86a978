//! Ring Boot: dependency-gated four-phase boot with ternary verification.
//!
//! A boot run walks a fixed sequence of phases over a resource unit pool,
//! gated by the resolution of a dependency graph:
//!
//! - **Sparse**: the graph is inspected and the first unit group allocated
//! - **Remember**: the graph is resolved dependency-first, with cycle
//!   detection, and the second unit group allocated
//! - **Active**: the remaining units are allocated and the pool activated
//! - **Verify**: the qualifying population yields Yes, No or Maybe
//!
//! The verdict maps to a halt code (`0x55`, `0xAA`, `0x00`) and to a
//! process exit status.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod machine;
pub mod orchestrator;
pub mod pool;
pub mod sink;
pub mod types;
pub mod verification;

// ── Re-exports ──────────────────────────────────────────────────────

pub use config::{BootConfig, UnitAllocation};
pub use error::{BootError, BootResult};
pub use graph::{
    create_boot_graph, reference_node_specs, reference_tree_spec, DependencyGraph,
    DependencyNode, Mark, NodeAction, NodeSpec, ResolutionContext, TreeEntry,
};
pub use machine::{BootStateMachine, PhaseTransition};
pub use orchestrator::{run_boot, BootOrchestrator, BootReport};
pub use pool::{ResourceUnit, ResourceUnitPool, MAX_UNIT_COUNT, REFERENCE_UNIT_COUNT};
pub use sink::{MemorySink, PhaseSink, StdoutSink, TracingSink};
pub use types::{
    exit_code, ActivationRank, BootId, BootPhase, NodeId, NodeState, Orientation, TreeLevel,
    VerificationResult, HALT_MAYBE, HALT_NO, HALT_YES,
};
pub use verification::{VerificationEngine, NO_THRESHOLD, YES_THRESHOLD};
