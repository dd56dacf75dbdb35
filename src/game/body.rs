//! Character Body
//!
//! Kinematic state of the single controllable character: position,
//! velocity, directional contact flags, death flag and jump buffer.
//!
//! The body is plain data. [`CharacterController`](crate::game::controller::CharacterController)
//! owns it and is the only code that integrates it; external respawn logic
//! goes through the getters/setters below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::hash::StateHasher;

/// Identity of a character body.
///
/// Lines refer back to their owner through this id instead of a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "body#{}", self.0)
    }
}

/// Which sides of the body currently touch a Solid surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFlags {
    /// Standing on a surface steep enough to count as ground.
    pub grounded: bool,
    /// Touching a surface above.
    pub ceilinged: bool,
    /// Touching a wall on the left (-x) side.
    pub walled_left: bool,
    /// Touching a wall on the right (+x) side.
    pub walled_right: bool,
}

impl ContactFlags {
    /// No contact on any side.
    pub const NONE: Self = Self {
        grounded: false,
        ceilinged: false,
        walled_left: false,
        walled_right: false,
    };

    /// Check if any side is in contact.
    #[inline]
    pub fn any(&self) -> bool {
        self.grounded || self.ceilinged || self.walled_left || self.walled_right
    }

    /// Pack into a bitmask (grounded, ceilinged, left, right).
    #[inline]
    pub fn bits(&self) -> u8 {
        (self.grounded as u8)
            | (self.ceilinged as u8) << 1
            | (self.walled_left as u8) << 2
            | (self.walled_right as u8) << 3
    }
}

/// Character state mutated once per tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterBody {
    /// Identity used by lines to find their owner.
    pub id: BodyId,

    /// Collider center.
    pub position: Vec2,

    /// Velocity (units/second).
    pub velocity: Vec2,

    /// Contact flags from this tick's probe and resolution.
    pub contacts: ContactFlags,

    /// Dead bodies ignore input and never integrate.
    pub dead: bool,

    /// Remaining jump-buffer time (seconds). Live while > 0.
    pub jump_buffer: f32,

    /// Horizontal input applied on the current tick, in [-1, 1].
    pub move_input: f32,
}

impl CharacterBody {
    /// Create a body at rest at `position`.
    pub fn new(id: BodyId, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            contacts: ContactFlags::NONE,
            dead: false,
            jump_buffer: 0.0,
            move_input: 0.0,
        }
    }

    /// Get position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Set position. Non-finite positions are ignored.
    pub fn set_position(&mut self, position: Vec2) {
        if position.is_finite() {
            self.position = position;
        }
    }

    /// Get velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Set velocity. Non-finite velocities are replaced by zero.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = if velocity.is_finite() {
            velocity
        } else {
            Vec2::ZERO
        };
    }

    /// Check if the body is dead.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Kill the body: velocity zeroed, input and jump buffer dropped.
    ///
    /// Returns `false` if it was already dead.
    pub fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.dead = true;
        self.velocity = Vec2::ZERO;
        self.move_input = 0.0;
        self.jump_buffer = 0.0;
        true
    }

    /// Bring the body back at `position` with every transient cleared.
    pub fn respawn(&mut self, position: Vec2) {
        self.set_position(position);
        self.velocity = Vec2::ZERO;
        self.contacts = ContactFlags::NONE;
        self.dead = false;
        self.jump_buffer = 0.0;
        self.move_input = 0.0;
    }

    /// Hash this body's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id.0);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_u8(self.contacts.bits());
        hasher.update_bool(self.dead);
        hasher.update_f32(self.jump_buffer);
        hasher.update_f32(self.move_input);
    }
}
