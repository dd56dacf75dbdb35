//! Game Logic Module
//!
//! Character and grapple-line simulation. Deterministic for a given input
//! sequence, geometry and config.
//!
//! ## Module Structure
//!
//! - `config`: Physics tunables
//! - `input`: Per-tick input frames
//! - `body`: Character kinematic state and contact flags
//! - `controller`: Movement and collision resolution
//! - `line`: Grappling line (Web / Rope)
//! - `session`: Session hooks, respawn and checkpoints
//! - `events`: Events for presentation and replay
//! - `tick`: Fixed-step simulation driver
//! - `replay`: Input recordings

pub mod body;
pub mod config;
pub mod controller;
pub mod events;
pub mod input;
pub mod line;
pub mod replay;
pub mod session;
pub mod tick;

// Re-export key types
pub use body::{BodyId, CharacterBody, ContactFlags};
pub use config::{ConfigError, PhysicsConfig};
pub use controller::{CharacterController, TickContext};
pub use events::{DestroyReason, GameEvent, GameEventData};
pub use input::{FireCommand, InputFrame};
pub use line::{GrapplingLine, LineKind, LineState};
pub use replay::{replay, InputRecording, ReplayError};
pub use session::{GameSession, SessionHooks};
pub use tick::{Simulation, TickResult, PLAYER_BODY};
