//! # Grapple Core
//!
//! Physics and collision core of a 2D grappling platformer: a fixed-step
//! character controller plus a grappling line with two tension models.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       GRAPPLE CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── math.rs     - Vec2 helpers (move-towards, clipping)     │
//! │  └── hash.rs     - State hashing for replay verification     │
//! │                                                              │
//! │  collision/      - Geometry queries                          │
//! │  ├── mod.rs      - CollisionQuery trait, surface kinds       │
//! │  └── world.rs    - Axis-aligned level geometry               │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── config.rs   - Physics tunables                          │
//! │  ├── input.rs    - Per-tick input frames                     │
//! │  ├── body.rs     - Character kinematic state                 │
//! │  ├── controller.rs - Movement and swept resolution           │
//! │  ├── line.rs     - Grappling line (Web / Rope)               │
//! │  ├── session.rs  - Session hooks, respawn, checkpoints       │
//! │  ├── events.rs   - Events for presentation listeners         │
//! │  ├── tick.rs     - Fixed-step simulation driver              │
//! │  └── replay.rs   - Input recordings                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! The simulation is single-threaded and fixed-step:
//! - No system time, no randomness, no global state
//! - Collision results are ordered by distance, then collider id
//! - Line forces computed in one tick are integrated on the next
//!
//! Given identical inputs, geometry and config, two runs produce the same
//! state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod collision;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use collision::{
    Collider, CollisionQuery, Hit, LevelDescription, LevelGeometry, NoCollision, SurfaceKind,
};
pub use game::config::PhysicsConfig;
pub use game::controller::CharacterController;
pub use game::input::InputFrame;
pub use game::line::{GrapplingLine, LineKind};
pub use game::tick::{Simulation, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;
