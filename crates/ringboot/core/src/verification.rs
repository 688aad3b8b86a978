//! Ternary verification of the resource pool.

use tracing::info;

use crate::machine::BootStateMachine;
use crate::pool::ResourceUnitPool;
use crate::types::VerificationResult;

/// Qualifying units needed for [`VerificationResult::Yes`].
pub const YES_THRESHOLD: usize = 6;
/// Below this many qualifying units the result is [`VerificationResult::No`].
pub const NO_THRESHOLD: usize = 3;

/// Stateless verifier mapping the pool population to a ternary result.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerificationEngine;

impl VerificationEngine {
    /// The threshold rule on a bare qualifying count.
    pub fn classify(count: usize) -> VerificationResult {
        if count >= YES_THRESHOLD {
            VerificationResult::Yes
        } else if count < NO_THRESHOLD {
            VerificationResult::No
        } else {
            VerificationResult::Maybe
        }
    }

    pub fn verify(pool: &ResourceUnitPool) -> VerificationResult {
        let qualifying = pool.qualifying_count();
        let result = Self::classify(qualifying);
        info!(qualifying, units = pool.len(), result = %result, "Pool verified");
        result
    }

    /// Verify and store the result on the state machine.
    pub fn verify_and_record(
        pool: &ResourceUnitPool,
        machine: &mut BootStateMachine,
    ) -> VerificationResult {
        let result = Self::verify(pool);
        machine.record_verification(result);
        result
    }
}
