//! Simulation Tick
//!
//! The fixed-step driver. One call to [`Simulation::step`] runs, in order:
//!
//! 1. Input (ignored while dead)
//! 2. Controller tick: probe, integrate, resolve, triggers
//! 3. Line tick: flight or tension, written into the body's velocity
//! 4. Final speed clamp
//! 5. Session: respawn countdown
//! 6. Event drain
//!
//! Line forces from step 3 are integrated by the controller on the next
//! call. The driver uses no clock, no randomness and no globals; the same
//! inputs against the same geometry always produce the same state hash.

use glam::Vec2;

use crate::collision::{CollisionQuery, LevelDescription};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::game::body::BodyId;
use crate::game::config::PhysicsConfig;
use crate::game::controller::{CharacterController, TickContext};
use crate::game::events::GameEvent;
use crate::game::input::InputFrame;
use crate::game::session::GameSession;

/// Identity of the single player body.
pub const PLAYER_BODY: BodyId = BodyId(0);

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the body respawned this tick
    pub respawned: bool,
    /// Whether the exit has been reached
    pub level_complete: bool,
}

/// One character in one level, advanced at a fixed rate.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// Ticks run so far
    pub tick: u32,
    /// The player
    pub controller: CharacterController,
    /// Respawn and checkpoint bookkeeping
    pub session: GameSession,
    /// Physics tunables
    pub config: PhysicsConfig,
}

impl Simulation {
    /// Create a simulation with the player at rest at `spawn`.
    pub fn new(spawn: Vec2, config: PhysicsConfig) -> Self {
        let session = GameSession::new(spawn, config.respawn_delay_ticks);
        Self {
            tick: 0,
            controller: CharacterController::new(PLAYER_BODY, spawn),
            session,
            config,
        }
    }

    /// Create a simulation at a level's spawn point.
    pub fn for_level(level: &LevelDescription, config: PhysicsConfig) -> Self {
        Self::new(level.spawn, config)
    }

    /// Run one simulation tick.
    pub fn step(&mut self, input: &InputFrame, world: &dyn CollisionQuery) -> TickResult {
        let mut result = TickResult::default();

        // 0. Advance tick counter
        self.tick += 1;
        let ctx = TickContext::new(self.tick, world, &self.config);

        // 1. Apply input
        self.controller.apply_input(input, &ctx);

        // 2. Move and resolve the body
        self.controller.tick(&ctx, &mut self.session);

        // 3. Line flight / tension
        self.controller.tick_line(&ctx);

        // 4. Line forces must not break the cap
        self.controller.clamp_speed(&self.config);

        // 5. Respawn countdown
        if let Some(point) = self.session.tick() {
            self.controller.respawn(point);
            result.respawned = true;
        }
        result.level_complete = self.session.is_complete();

        // 6. Collect events
        result.events = self.controller.take_events();
        result
    }

    /// Compute hash of current state for verification.
    pub fn state_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            self.controller.hash_into(hasher);

            let (deaths, countdown, checkpoint) = self.session.summary();
            hasher.update_u32(deaths);
            hasher.update_u32(countdown);
            hasher.update_u32(checkpoint.unwrap_or(u32::MAX));
            hasher.update_bool(self.session.is_complete());
        })
    }
}
