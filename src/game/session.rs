//! Session Hooks
//!
//! Callbacks from the controller into the game/session layer, and
//! [`GameSession`], the respawn and checkpoint bookkeeping that backs them.
//!
//! Every hook has a no-op default and `()` implements the trait, so a
//! controller can run with no session attached.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::collision::ColliderId;
use crate::game::body::BodyId;

/// Receives trigger contacts from the controller.
///
/// Contacts are edge-triggered: each fires once when the body starts
/// overlapping the trigger.
pub trait SessionHooks {
    /// The body touched a hazard. The controller has already killed it.
    fn on_hazard_contact(&mut self, _body: BodyId) {}

    /// The body touched a checkpoint located at `position`.
    fn on_checkpoint_contact(&mut self, _body: BodyId, _checkpoint: ColliderId, _position: Vec2) {}

    /// The body touched the level exit.
    fn on_exit_contact(&mut self, _body: BodyId, _exit: ColliderId) {}
}

/// No session attached.
impl SessionHooks for () {}

/// A checkpoint the body has activated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActiveCheckpoint {
    /// Checkpoint collider.
    pub id: ColliderId,
    /// Respawn position.
    pub position: Vec2,
}

/// Respawn and checkpoint bookkeeping for one level attempt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    start_position: Vec2,
    checkpoint: Option<ActiveCheckpoint>,
    /// Ticks left until respawn; `Some` while the body is dead.
    respawn_countdown: Option<u32>,
    respawn_delay_ticks: u32,
    deaths: u32,
    exit: Option<ColliderId>,
}

impl GameSession {
    /// Create a session that respawns at `start_position` until a checkpoint
    /// is reached.
    pub fn new(start_position: Vec2, respawn_delay_ticks: u32) -> Self {
        Self {
            start_position,
            checkpoint: None,
            respawn_countdown: None,
            respawn_delay_ticks,
            deaths: 0,
            exit: None,
        }
    }

    /// Where the body comes back: the active checkpoint, else the start.
    pub fn respawn_point(&self) -> Vec2 {
        self.checkpoint
            .map(|checkpoint| checkpoint.position)
            .unwrap_or(self.start_position)
    }

    /// Currently active checkpoint.
    #[inline]
    pub fn active_checkpoint(&self) -> Option<ActiveCheckpoint> {
        self.checkpoint
    }

    /// Check if a death is waiting on its respawn.
    #[inline]
    pub fn is_awaiting_respawn(&self) -> bool {
        self.respawn_countdown.is_some()
    }

    /// Number of deaths so far.
    #[inline]
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Exit reached, if any.
    #[inline]
    pub fn exit_reached(&self) -> Option<ColliderId> {
        self.exit
    }

    /// Check if the level has been completed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.exit.is_some()
    }

    /// Advance the respawn countdown by one tick.
    ///
    /// Returns the respawn position on the tick the countdown elapses.
    pub fn tick(&mut self) -> Option<Vec2> {
        let remaining = self.respawn_countdown?;
        if remaining == 0 {
            self.respawn_countdown = None;
            let point = self.respawn_point();
            info!("Respawning at ({:.2}, {:.2})", point.x, point.y);
            Some(point)
        } else {
            self.respawn_countdown = Some(remaining - 1);
            None
        }
    }

    /// Hash-relevant summary: (deaths, countdown, checkpoint id).
    pub fn summary(&self) -> (u32, u32, Option<ColliderId>) {
        (
            self.deaths,
            self.respawn_countdown.unwrap_or(u32::MAX),
            self.checkpoint.map(|checkpoint| checkpoint.id),
        )
    }
}

impl SessionHooks for GameSession {
    fn on_hazard_contact(&mut self, body: BodyId) {
        if self.respawn_countdown.is_some() {
            debug!("{} already dead, ignoring hazard", body);
            return;
        }
        self.deaths += 1;
        self.respawn_countdown = Some(self.respawn_delay_ticks);
        info!("{} died (deaths: {})", body, self.deaths);
    }

    fn on_checkpoint_contact(&mut self, body: BodyId, checkpoint: ColliderId, position: Vec2) {
        if self.checkpoint.is_some_and(|active| active.id == checkpoint) {
            return;
        }
        if let Some(previous) = self.checkpoint {
            debug!("Checkpoint {} deactivated", previous.id);
        }
        self.checkpoint = Some(ActiveCheckpoint {
            id: checkpoint,
            position,
        });
        info!("{} activated checkpoint {}", body, checkpoint);
    }

    fn on_exit_contact(&mut self, body: BodyId, exit: ColliderId) {
        if self.exit.is_none() {
            info!("{} reached exit {}", body, exit);
            self.exit = Some(exit);
        }
    }
}
