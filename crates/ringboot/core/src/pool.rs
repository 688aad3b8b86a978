//! Resource unit pool.
//!
//! A fixed-size collection of abstract slots. Each unit carries an
//! orientation tag and an activation rank that only escalates.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BootError, BootResult};
use crate::types::{ActivationRank, Orientation};

/// Pool size of the reference boot.
pub const REFERENCE_UNIT_COUNT: usize = 8;

/// Largest pool a run may request.
pub const MAX_UNIT_COUNT: usize = 4096;

// ── Resource Unit ───────────────────────────────────────────────────

/// A single allocatable slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUnit {
    pub orientation: Orientation,
    pub rank: ActivationRank,
    /// Set on first allocation and never cleared.
    pub stabilized: bool,
}

impl ResourceUnit {
    /// Stabilized and at least remembered.
    pub fn is_qualifying(&self) -> bool {
        self.stabilized && self.rank >= ActivationRank::Remembered
    }

    fn raise_to(&mut self, rank: ActivationRank) {
        self.rank = self.rank.max(rank);
    }
}

// ── Resource Unit Pool ──────────────────────────────────────────────

/// Fixed-size pool of resource units, indexed from zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUnitPool {
    units: Vec<ResourceUnit>,
}

impl ResourceUnitPool {
    /// A pool of `size` idle, unstabilized units facing north.
    pub fn new(size: usize) -> Self {
        Self {
            units: vec![ResourceUnit::default(); size],
        }
    }

    /// Allocate a unit: set its orientation, stabilize it, and raise it to
    /// at least [`ActivationRank::Remembered`].
    pub fn allocate(&mut self, index: usize, orientation: Orientation) -> BootResult<()> {
        let size = self.units.len();
        let unit = self
            .units
            .get_mut(index)
            .ok_or(BootError::InvalidUnitIndex { index, size })?;
        unit.orientation = orientation;
        unit.stabilized = true;
        unit.raise_to(ActivationRank::Remembered);
        debug!(index, orientation = %orientation, rank = %unit.rank, "Unit allocated");
        Ok(())
    }

    /// Force every unit to [`ActivationRank::Active`], allocated or not.
    pub fn activate_all(&mut self) {
        for unit in &mut self.units {
            unit.raise_to(ActivationRank::Active);
        }
    }

    pub fn qualifying_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_qualifying()).count()
    }

    pub fn units(&self) -> &[ResourceUnit] {
        &self.units
    }

    pub fn unit(&self, index: usize) -> Option<&ResourceUnit> {
        self.units.get(index)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Per-unit verification detail, e.g. `0:OK 1:OK 2:--`.
    pub fn status_line(&self) -> String {
        self.units
            .iter()
            .enumerate()
            .map(|(i, u)| format!("{}:{}", i, if u.is_qualifying() { "OK" } else { "--" }))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ResourceUnitPool {
    fn default() -> Self {
        Self::new(REFERENCE_UNIT_COUNT)
    }
}
