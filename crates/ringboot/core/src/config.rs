//! Boot run configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BootError, BootResult};
use crate::machine::DEFAULT_MAX_TRACKED_TRANSITIONS;
use crate::pool::{MAX_UNIT_COUNT, REFERENCE_UNIT_COUNT};
use crate::types::{BootPhase, Orientation};

// ── Allocation Plan ─────────────────────────────────────────────────

/// One planned allocation: a unit index and the orientation it takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAllocation {
    pub unit: usize,
    pub orientation: Orientation,
}

impl UnitAllocation {
    pub const fn new(unit: usize, orientation: Orientation) -> Self {
        Self { unit, orientation }
    }
}

impl From<(usize, Orientation)> for UnitAllocation {
    fn from((unit, orientation): (usize, Orientation)) -> Self {
        Self { unit, orientation }
    }
}

fn plan(entries: &[(usize, Orientation)]) -> Vec<UnitAllocation> {
    entries.iter().copied().map(UnitAllocation::from).collect()
}

// ── Boot Config ─────────────────────────────────────────────────────

/// Parameters of a boot run. Missing fields take the reference values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Size of the resource unit pool.
    pub unit_count: usize,
    /// Bound on the state machine's transition history.
    pub max_tracked_transitions: usize,
    /// Allocations made during the Sparse phase.
    pub sparse_plan: Vec<UnitAllocation>,
    /// Allocations made during the Remember phase, after resolution.
    pub remember_plan: Vec<UnitAllocation>,
    /// Allocations made during the Active phase, before activation.
    pub active_plan: Vec<UnitAllocation>,
}

impl Default for BootConfig {
    fn default() -> Self {
        use Orientation::*;
        Self {
            unit_count: REFERENCE_UNIT_COUNT,
            max_tracked_transitions: DEFAULT_MAX_TRACKED_TRANSITIONS,
            sparse_plan: plan(&[(0, North), (1, NorthEast), (2, East)]),
            remember_plan: plan(&[(4, South), (5, SouthWest), (6, West)]),
            active_plan: plan(&[(3, SouthEast), (7, NorthWest)]),
        }
    }
}

impl BootConfig {
    /// Reference plan on a pool of `unit_count` units.
    pub fn with_unit_count(unit_count: usize) -> Self {
        Self {
            unit_count,
            ..Self::default()
        }
    }

    /// Allocations planned for a phase. Verify allocates nothing.
    pub fn plan_for(&self, phase: BootPhase) -> &[UnitAllocation] {
        match phase {
            BootPhase::Sparse => self.sparse_plan.as_slice(),
            BootPhase::Remember => self.remember_plan.as_slice(),
            BootPhase::Active => self.active_plan.as_slice(),
            BootPhase::Verify => &[],
        }
    }

    /// Total planned allocations across all phases.
    pub fn planned_allocations(&self) -> usize {
        self.sparse_plan.len() + self.remember_plan.len() + self.active_plan.len()
    }

    /// Reject configurations no run can use.
    ///
    /// Plans addressing units beyond the pool are left for the run to
    /// report as `InvalidUnitIndex`.
    pub fn validate(&self) -> BootResult<()> {
        if self.unit_count == 0 {
            return Err(BootError::Configuration(
                "unit_count must be at least 1".into(),
            ));
        }
        if self.unit_count > MAX_UNIT_COUNT {
            return Err(BootError::Configuration(format!(
                "unit_count must be at most {}",
                MAX_UNIT_COUNT
            )));
        }
        if self.max_tracked_transitions == 0 {
            return Err(BootError::Configuration(
                "max_tracked_transitions must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
