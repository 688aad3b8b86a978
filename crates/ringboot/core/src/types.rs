//! Core types for the ring boot sequence.
//!
//! Defines node identity and tree levels, resource unit orientation and
//! activation rank, the four boot phases, and the ternary verification
//! result together with its halt code.

use serde::{Deserialize, Serialize};

// ── Identifiers ─────────────────────────────────────────────────────

/// Unique identifier for a single boot run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BootId(pub String);

impl BootId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for BootId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BootId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "boot:{}", self.0)
    }
}

/// Identifier of a node in the dependency graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

// ── Tree Level ──────────────────────────────────────────────────────

/// Descriptive depth tag of a dependency node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeLevel {
    /// Level 0: the node everything else hangs off.
    Root,
    /// Level 1: core systems.
    Trunk,
    /// Level 2: subsystems.
    Branch,
    /// Level 3: services.
    Leaf,
}

impl TreeLevel {
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Root => 0,
            Self::Trunk => 1,
            Self::Branch => 2,
            Self::Leaf => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Root),
            1 => Some(Self::Trunk),
            2 => Some(Self::Branch),
            3 => Some(Self::Leaf),
            _ => None,
        }
    }
}

impl std::fmt::Display for TreeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Trunk => write!(f, "trunk"),
            Self::Branch => write!(f, "branch"),
            Self::Leaf => write!(f, "leaf"),
        }
    }
}

// ── Node State ──────────────────────────────────────────────────────

/// Resolution state of a dependency node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeState {
    #[default]
    Unresolved,
    Resolving,
    Resolved,
    Failed,
}

impl std::fmt::Display for NodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unresolved => write!(f, "unresolved"),
            Self::Resolving => write!(f, "resolving"),
            Self::Resolved => write!(f, "resolved"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ── Orientation ─────────────────────────────────────────────────────

/// Compass-style orientation tag carried by a resource unit.
///
/// Eight symbolic directions in eighth-turn steps. The tag is recorded on
/// allocation and reported, it has no physical meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Orientation {
    /// All eight orientations in compass order.
    pub const ALL: [Orientation; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    pub fn ordinal(&self) -> u8 {
        match self {
            Self::North => 0,
            Self::NorthEast => 1,
            Self::East => 2,
            Self::SouthEast => 3,
            Self::South => 4,
            Self::SouthWest => 5,
            Self::West => 6,
            Self::NorthWest => 7,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::North => "N",
            Self::NorthEast => "NE",
            Self::East => "E",
            Self::SouthEast => "SE",
            Self::South => "S",
            Self::SouthWest => "SW",
            Self::West => "W",
            Self::NorthWest => "NW",
        };
        write!(f, "{}", name)
    }
}

// ── Activation Rank ─────────────────────────────────────────────────

/// Activation rank of a resource unit. Only ever escalates within a run.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ActivationRank {
    #[default]
    Idle,
    Remembered,
    Active,
}

impl std::fmt::Display for ActivationRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Remembered => write!(f, "remembered"),
            Self::Active => write!(f, "active"),
        }
    }
}

// ── Boot Phase ──────────────────────────────────────────────────────

/// The four phases of the ring boot sequence, in canonical order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootPhase {
    /// Phase 1: first units allocated, graph inspected.
    #[default]
    Sparse,
    /// Phase 2: dependency graph resolved, second unit group allocated.
    Remember,
    /// Phase 3: remaining units allocated, whole pool activated.
    Active,
    /// Phase 4: ternary verification.
    Verify,
}

impl BootPhase {
    /// Phases in the order the orchestrator issues them.
    pub const CANONICAL: [BootPhase; 4] = [Self::Sparse, Self::Remember, Self::Active, Self::Verify];

    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Sparse => 0,
            Self::Remember => 1,
            Self::Active => 2,
            Self::Verify => 3,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::CANONICAL.get(ordinal as usize).copied()
    }

    /// The canonical successor, if any.
    pub fn next(&self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Upper-case name used in phase log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sparse => "SPARSE",
            Self::Remember => "REMEMBER",
            Self::Active => "ACTIVE",
            Self::Verify => "VERIFY",
        }
    }
}

impl std::fmt::Display for BootPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Phase{}:{}", self.ordinal() + 1, self.name())
    }
}

// ── Verification Result ─────────────────────────────────────────────

/// Halt code emitted for a verified boot.
pub const HALT_YES: u8 = 0x55;
/// Halt code emitted for a failed boot.
pub const HALT_NO: u8 = 0xAA;
/// Halt code emitted for a partially verified boot.
pub const HALT_MAYBE: u8 = 0x00;

/// Three-valued outcome of a boot run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    Yes,
    No,
    Maybe,
}

impl VerificationResult {
    /// Byte a boot sector would place in `al` before halting.
    pub fn halt_code(&self) -> u8 {
        match self {
            Self::Yes => HALT_YES,
            Self::No => HALT_NO,
            Self::Maybe => HALT_MAYBE,
        }
    }

    pub fn from_halt_code(code: u8) -> Option<Self> {
        match code {
            HALT_YES => Some(Self::Yes),
            HALT_NO => Some(Self::No),
            HALT_MAYBE => Some(Self::Maybe),
            _ => None,
        }
    }

    pub fn is_verified(&self) -> bool {
        *self == Self::Yes
    }
}

impl std::fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
            Self::Maybe => write!(f, "MAYBE"),
        }
    }
}

/// Process exit status for a verification result: 0 for Yes, 1 otherwise.
pub fn exit_code(result: VerificationResult) -> i32 {
    if result.is_verified() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_id_display() {
        let id = BootId::new();
        assert!(id.to_string().starts_with("boot:"));
    }

    #[test]
    fn boot_id_unique() {
        assert_ne!(BootId::new(), BootId::new());
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(7).to_string(), "node:7");
    }

    #[test]
    fn tree_level_ordinals() {
        for i in 0..=3u8 {
            assert_eq!(TreeLevel::from_ordinal(i).unwrap().ordinal(), i);
        }
        assert!(TreeLevel::from_ordinal(4).is_none());
    }

    #[test]
    fn orientation_round_trips_through_ordinal() {
        for (i, o) in Orientation::ALL.iter().enumerate() {
            assert_eq!(o.ordinal() as usize, i);
        }
        assert!(Orientation::from_ordinal(8).is_none());
        assert_eq!(Orientation::SouthWest.to_string(), "SW");
    }

    #[test]
    fn activation_rank_is_ordered() {
        assert!(ActivationRank::Idle < ActivationRank::Remembered);
        assert!(ActivationRank::Remembered < ActivationRank::Active);
    }

    #[test]
    fn phase_next_follows_canonical_order() {
        assert_eq!(BootPhase::Sparse.next(), Some(BootPhase::Remember));
        assert_eq!(BootPhase::Remember.next(), Some(BootPhase::Active));
        assert_eq!(BootPhase::Active.next(), Some(BootPhase::Verify));
        assert!(BootPhase::Verify.next().is_none());
    }

    #[test]
    fn phase_display() {
        assert_eq!(BootPhase::Sparse.to_string(), "Phase1:SPARSE");
        assert_eq!(BootPhase::Verify.to_string(), "Phase4:VERIFY");
    }

    #[test]
    fn halt_codes() {
        assert_eq!(VerificationResult::Yes.halt_code(), 0x55);
        assert_eq!(VerificationResult::No.halt_code(), 0xAA);
        assert_eq!(VerificationResult::Maybe.halt_code(), 0x00);
        assert_eq!(
            VerificationResult::from_halt_code(0xAA),
            Some(VerificationResult::No)
        );
        assert!(VerificationResult::from_halt_code(0x01).is_none());
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(VerificationResult::Yes), 0);
        assert_eq!(exit_code(VerificationResult::No), 1);
        assert_eq!(exit_code(VerificationResult::Maybe), 1);
    }

    #[test]
    fn verification_result_serializes_lowercase() {
        let json = serde_json::to_string(&VerificationResult::Maybe).unwrap();
        assert_eq!(json, "\"maybe\"");
    }
}
