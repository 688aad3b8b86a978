//! Boot orchestrator: runs the four-phase boot sequence.
//!
//! Pipeline:
//! 1. Sparse: inspect the graph, allocate the first unit group
//! 2. Remember: resolve the dependency graph, allocate the second group
//! 3. Active: allocate the remaining units, activate the whole pool
//! 4. Verify: classify the pool and record the result
//!
//! A failed resolution or an out-of-range allocation halts the run with
//! [`VerificationResult::No`]. Later phases are not entered.

use chrono::Utc;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::BootConfig;
use crate::error::{BootError, BootResult};
use crate::graph::DependencyGraph;
use crate::machine::BootStateMachine;
use crate::pool::ResourceUnitPool;
use crate::sink::PhaseSink;
use crate::types::{exit_code, BootId, BootPhase, NodeId, VerificationResult};
use crate::verification::VerificationEngine;

// ── Boot Report ─────────────────────────────────────────────────────

/// Everything a finished run leaves behind.
#[derive(Debug, Serialize)]
pub struct BootReport {
    pub run_id: BootId,
    pub result: VerificationResult,
    pub halt_code: u8,
    /// Every line emitted to the sink, in order.
    pub phase_log: Vec<String>,
    pub resolution_order: Vec<NodeId>,
    pub resolved_count: usize,
    pub machine: BootStateMachine,
    pub pool: ResourceUnitPool,
    #[serde(skip)]
    pub graph: DependencyGraph,
    /// The error that halted the run, if any.
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<BootError>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

fn serialize_error<S: Serializer>(error: &Option<BootError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

impl BootReport {
    /// Whether the run was cut short by an error.
    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }

    /// Process exit status: 0 for Yes, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        exit_code(self.result)
    }

    /// The verdict, or the error that halted the run.
    pub fn into_result(self) -> BootResult<VerificationResult> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.result),
        }
    }
}

impl std::fmt::Display for BootReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} result={} halt=0x{:02X} resolved={} transitions={}",
            self.run_id,
            self.result,
            self.halt_code,
            self.resolved_count,
            self.machine.transition_count()
        )
    }
}

// ── Boot Orchestrator ───────────────────────────────────────────────

/// Owns the graph, pool and state machine for a single run.
pub struct BootOrchestrator {
    run_id: BootId,
    config: BootConfig,
    graph: DependencyGraph,
    pool: ResourceUnitPool,
    machine: BootStateMachine,
    phase_log: Vec<String>,
}

impl BootOrchestrator {
    /// An invalid `config` yields an empty pool and the run halts with its
    /// configuration error.
    pub fn new(graph: DependencyGraph, config: BootConfig) -> Self {
        let units = if config.validate().is_ok() {
            config.unit_count
        } else {
            0
        };
        Self {
            run_id: BootId::new(),
            pool: ResourceUnitPool::new(units),
            machine: BootStateMachine::with_history_limit(config.max_tracked_transitions),
            graph,
            config,
            phase_log: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &BootId {
        &self.run_id
    }

    pub fn config(&self) -> &BootConfig {
        &self.config
    }

    /// Run the boot sequence to completion or to the first fatal error.
    pub fn run(mut self, sink: &mut dyn PhaseSink) -> BootReport {
        let started_at = Utc::now();
        info!(run_id = %self.run_id, units = self.pool.len(), "Boot sequence started");

        let (result, error) = match self.execute(sink) {
            Ok(result) => (result, None),
            Err(e) => {
                warn!(run_id = %self.run_id, error = %e, "Boot sequence halted");
                self.emit(sink, format!("[ERROR] {}", e));
                self.machine.record_verification(VerificationResult::No);
                (VerificationResult::No, Some(e))
            }
        };

        let banner = match result {
            VerificationResult::Yes => "=== BOOT SUCCESS ===",
            VerificationResult::Maybe => "=== BOOT PARTIAL ===",
            VerificationResult::No => "=== BOOT FAILED ===",
        };
        self.emit(sink, banner.to_string());

        info!(
            run_id = %self.run_id,
            result = %result,
            halt_code = result.halt_code(),
            "Boot sequence finished"
        );

        BootReport {
            run_id: self.run_id,
            result,
            halt_code: result.halt_code(),
            phase_log: self.phase_log,
            resolution_order: self.graph.resolution_order().to_vec(),
            resolved_count: self.graph.resolved_count(),
            machine: self.machine,
            pool: self.pool,
            graph: self.graph,
            error,
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn execute(&mut self, sink: &mut dyn PhaseSink) -> BootResult<VerificationResult> {
        self.config.validate()?;

        // Phase 1
        self.enter(sink, BootPhase::Sparse, "initializing");
        self.emit(
            sink,
            format!(
                "[SPARSE] tree nodes: {}, depth: {}",
                self.graph.node_count(),
                self.graph.max_depth()
            ),
        );
        self.allocate_plan(sink, BootPhase::Sparse)?;
        self.machine.transition(BootPhase::Remember);

        // Phase 2
        self.enter(sink, BootPhase::Remember, "resolving dependencies");
        let resolved = self.graph.resolve()?;
        self.emit(sink, format!("[REMEMBER] resolved {} nodes", resolved));
        self.allocate_plan(sink, BootPhase::Remember)?;
        self.machine.transition(BootPhase::Active);

        // Phase 3
        self.enter(sink, BootPhase::Active, "full activation");
        self.allocate_plan(sink, BootPhase::Active)?;
        self.pool.activate_all();
        self.emit(sink, format!("[ACTIVE] {} units activated", self.pool.len()));
        self.machine.transition(BootPhase::Verify);

        // Phase 4
        self.enter(sink, BootPhase::Verify, "ternary check");
        let result = VerificationEngine::verify_and_record(&self.pool, &mut self.machine);
        self.emit(sink, format!("[VERIFY] unit status: {}", self.pool.status_line()));
        let verdict = match result {
            VerificationResult::Yes => "boot verified",
            VerificationResult::Maybe => "partial verification",
            VerificationResult::No => "verification failed",
        };
        self.emit(sink, format!("[VERIFY] {} - {}", result, verdict));
        Ok(result)
    }

    fn enter(&mut self, sink: &mut dyn PhaseSink, phase: BootPhase, what: &str) {
        self.emit(
            sink,
            format!("[Phase {}] {} state - {}", phase.ordinal() + 1, phase.name(), what),
        );
    }

    fn allocate_plan(&mut self, sink: &mut dyn PhaseSink, phase: BootPhase) -> BootResult<()> {
        let plan = self.config.plan_for(phase);
        if plan.is_empty() {
            return Ok(());
        }
        for allocation in plan {
            self.pool.allocate(allocation.unit, allocation.orientation)?;
        }
        let tags: Vec<String> = plan.iter().map(|a| a.orientation.to_string()).collect();
        let line = format!(
            "[{}] allocated {} units ({})",
            phase.name(),
            plan.len(),
            tags.join(" ")
        );
        self.emit(sink, line);
        Ok(())
    }

    fn emit(&mut self, sink: &mut dyn PhaseSink, line: String) {
        sink.emit(&line);
        self.phase_log.push(line);
    }
}

/// Run the reference boot plan over `graph` on a pool of `unit_count` units.
pub fn run_boot(graph: DependencyGraph, unit_count: usize, sink: &mut dyn PhaseSink) -> BootReport {
    BootOrchestrator::new(graph, BootConfig::with_unit_count(unit_count)).run(sink)
}
