//! Sources of initial-delay jitter.

use rand::Rng;

/// Picks the jitter slot for a record's first attempt.
///
/// The runner asks for a slot in `0..slots`, where `slots` is the worker
/// count, and multiplies it by [`JITTER_STEP`](crate::retry::JITTER_STEP).
pub trait JitterSource: Send + Sync {
    /// Return a slot in `0..slots`. `slots` is never zero.
    fn slot(&self, slots: u32) -> u32;
}

/// Uniformly random slots from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn slot(&self, slots: u32) -> u32 {
        if slots <= 1 {
            return 0;
        }
        rand::thread_rng().gen_range(0..slots)
    }
}

/// Always the same slot, clamped to the available range.
///
/// Useful for deterministic tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub u32);

impl JitterSource for FixedJitter {
    fn slot(&self, slots: u32) -> u32 {
        self.0.min(slots.saturating_sub(1))
    }
}
