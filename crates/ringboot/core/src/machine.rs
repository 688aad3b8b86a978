//! Boot state machine: tracks the current phase and transition history.
//!
//! Transitions are unconditional: any phase may follow any other. The
//! orchestrator is the only caller that cares about canonical order.

use std::collections::VecDeque;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::{BootPhase, VerificationResult};

/// Default bound on the transition history.
pub const DEFAULT_MAX_TRACKED_TRANSITIONS: usize = 64;

// ── Phase Transition ────────────────────────────────────────────────

/// Record of a phase transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: BootPhase,
    pub to: BootPhase,
    /// Value of the transition counter after this transition.
    pub sequence: u64,
    pub transitioned_at: chrono::DateTime<chrono::Utc>,
}

impl std::fmt::Display for PhaseTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transition(#{}: {} → {})", self.sequence, self.from, self.to)
    }
}

// ── Boot State Machine ──────────────────────────────────────────────

/// Current and previous boot phase, with a bounded transition history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BootStateMachine {
    current: BootPhase,
    previous: BootPhase,
    transition_count: u64,
    transitions: VecDeque<PhaseTransition>,
    max_transitions: usize,
    last_result: Option<VerificationResult>,
}

impl BootStateMachine {
    /// Start in [`BootPhase::Sparse`] with no history.
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_MAX_TRACKED_TRANSITIONS)
    }

    /// Keep at most `max_transitions` history records, never fewer than one.
    pub fn with_history_limit(max_transitions: usize) -> Self {
        Self {
            current: BootPhase::Sparse,
            previous: BootPhase::Sparse,
            transition_count: 0,
            transitions: VecDeque::new(),
            max_transitions: max_transitions.max(1),
            last_result: None,
        }
    }

    pub fn current(&self) -> BootPhase {
        self.current
    }

    pub fn previous(&self) -> BootPhase {
        self.previous
    }

    /// Total transitions taken, including those evicted from history.
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    pub fn transitions(&self) -> &VecDeque<PhaseTransition> {
        &self.transitions
    }

    /// Move to `next`, whatever the current phase is.
    pub fn transition(&mut self, next: BootPhase) -> PhaseTransition {
        self.previous = self.current;
        self.current = next;
        self.transition_count += 1;

        info!(
            from = %self.previous,
            to = %self.current,
            sequence = self.transition_count,
            "Boot phase transition"
        );

        let record = PhaseTransition {
            from: self.previous,
            to: self.current,
            sequence: self.transition_count,
            transitioned_at: Utc::now(),
        };
        while self.transitions.len() >= self.max_transitions.max(1) {
            self.transitions.pop_front();
        }
        self.transitions.push_back(record.clone());
        record
    }

    pub fn record_verification(&mut self, result: VerificationResult) {
        self.last_result = Some(result);
    }

    /// Last recorded verification, `None` until one is recorded.
    pub fn last_result(&self) -> Option<VerificationResult> {
        self.last_result
    }
}

impl Default for BootStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
