//! Input Frames
//!
//! Per-tick movement intent fed to the simulation driver. Frames are plain
//! data so they can be recorded and replayed bit-for-bit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::math::finite_or_zero;
use crate::game::line::LineKind;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Request to launch a grapple line this tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireCommand {
    /// World-space point the line is aimed at.
    pub target: Vec2,
    /// Which tension model the line uses once attached.
    pub kind: LineKind,
}

/// Single frame of input from the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Horizontal movement intent in [-1, 1].
    pub move_x: f32,

    /// Jump pressed this tick (starts the jump buffer).
    pub jump: bool,

    /// Fire a line this tick.
    pub fire: Option<FireCommand>,

    /// Cancel the current line this tick.
    pub cancel: bool,
}

impl InputFrame {
    /// Create an empty input frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame with horizontal movement only.
    pub fn with_movement(move_x: f32) -> Self {
        Self {
            move_x,
            ..Self::default()
        }
    }

    /// Set the jump flag.
    pub fn jumping(mut self) -> Self {
        self.jump = true;
        self
    }

    /// Fire a line of `kind` at `target`.
    pub fn firing(mut self, target: Vec2, kind: LineKind) -> Self {
        self.fire = Some(FireCommand { target, kind });
        self
    }

    /// Set the cancel flag.
    pub fn cancelling(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Horizontal input clamped to [-1, 1]; NaN and infinities read as 0.
    #[inline]
    pub fn horizontal(&self) -> f32 {
        finite_or_zero(self.move_x).clamp(-1.0, 1.0)
    }

    /// Check if this frame carries any intent at all.
    pub fn is_idle(&self) -> bool {
        self.horizontal() == 0.0 && !self.jump && self.fire.is_none() && !self.cancel
    }
}
