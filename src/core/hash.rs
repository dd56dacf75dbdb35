//! State Hashing for Verification
//!
//! Provides deterministic hashing of simulation state for:
//! - Replay validation (same inputs must reproduce the same hash)
//! - Regression checks between builds
//!
//! Floats are hashed by their bit patterns, so two states hash equal only
//! when every component is bit-identical.

use glam::Vec2;
use sha2::{Digest, Sha256};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for simulation state.
///
/// Wraps SHA-256 with helpers for the simulation's scalar and vector types.
/// Order of updates is critical for determinism.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for simulation state.
    pub fn for_simulation_state() -> Self {
        Self::new(b"GRAPPLE_CORE_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with an f32 value (bit pattern, little-endian).
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.update_u32(value.to_bits());
    }

    /// Update with a Vec2.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        self.update_f32(value.x);
        self.update_f32(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute hash with domain separator.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> StateHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute state hash for replay verification.
///
/// The closure adds state-specific data after the tick counter.
pub fn compute_state_hash<F>(tick: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_simulation_state();

    // Always hash tick first
    hasher.update_u32(tick);

    add_state(&mut hasher);

    hasher.finalize()
}
