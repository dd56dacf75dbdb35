//! Core deterministic primitives.
//!
//! Vector helpers and state hashing shared by the collision and game layers.

pub mod hash;
pub mod math;

// Re-export core types
pub use hash::{compute_state_hash, StateHash, StateHasher};
pub use math::{direction_and_length, move_towards};
