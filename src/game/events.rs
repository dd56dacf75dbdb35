//! Game Events
//!
//! State transitions emitted by the controller and its line during a tick.
//! Presentation (line rendering, shake, audio, animation) listens to these
//! instead of being driven from inside the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::ColliderId;
use crate::game::body::BodyId;
use crate::game::line::LineKind;

/// Why a grapple line was destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DestroyReason {
    /// Flew its full length without a predicted target.
    MaxRange = 0,
    /// Arrived at a surface that does not accept lines.
    NotGrippable = 1,
    /// Owner got closer to the anchor than the minimum attached length.
    TooShort = 2,
    /// Owner died.
    OwnerDied = 3,
    /// Explicit cancel (input or replacing fire).
    Cancelled = 4,
    /// Ticked against a body that is not its owner.
    OwnerMismatch = 5,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Jump impulse applied
    Jumped,

    /// Became grounded after being airborne
    Landed {
        position: Vec2,
    },

    /// Line launched
    LineFired {
        kind: LineKind,
        target: Vec2,
        /// Predicted impact point, if the launch ray found a solid surface
        predicted: Option<Vec2>,
    },

    /// Line attached to a surface
    LineAttached {
        kind: LineKind,
        anchor: Vec2,
        /// Rope constraint length (`None` for Web)
        length: Option<f32>,
    },

    /// Line destroyed
    LineDestroyed {
        kind: LineKind,
        reason: DestroyReason,
    },

    /// Body died on a hazard
    Died {
        position: Vec2,
    },

    /// Body came back after death
    Respawned {
        position: Vec2,
    },

    /// Touched a checkpoint
    CheckpointReached {
        checkpoint: ColliderId,
    },

    /// Touched the level exit
    ExitReached {
        exit: ColliderId,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Body involved
    pub body: BodyId,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, body: BodyId, data: GameEventData) -> Self {
        Self { tick, body, data }
    }

    /// Create line destroyed event.
    pub fn line_destroyed(tick: u32, body: BodyId, kind: LineKind, reason: DestroyReason) -> Self {
        Self::new(tick, body, GameEventData::LineDestroyed { kind, reason })
    }

    /// Check if this event ends the body's current life.
    pub fn is_death(&self) -> bool {
        matches!(self.data, GameEventData::Died { .. })
    }
}
