//! Grappling Line
//!
//! A projectile fired by the character that, once attached, pulls back on
//! its owner. Two tension models share one state machine:
//!
//! ```text
//!   Flying ──▶ Attached ──▶ Destroyed
//!     │                        ▲
//!     └────────────────────────┘
//! ```
//!
//! - **Web**: constant attraction toward the anchor, no slack limit.
//! - **Rope**: inextensible string of the length measured at attach time.
//!
//! The line never holds a reference to its owner. It records the owner's
//! [`BodyId`] and is handed the owner's body every tick; a body with a
//! different id destroys the line. Forces are written into the owner's
//! velocity after the owner has moved, so they take effect on the next tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::collision::{first_solid_hit, ColliderId, CollisionQuery};
use crate::core::hash::StateHasher;
use crate::core::math::{decompose, direction_and_length, TIME_EPSILON};
use crate::game::body::{BodyId, CharacterBody};
use crate::game::config::PhysicsConfig;
use crate::game::events::DestroyReason;

// =============================================================================
// TYPES
// =============================================================================

/// Tension model of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LineKind {
    /// Constant pull toward the anchor; suspends gravity while attached.
    Web = 0,
    /// Fixed-length swing constraint.
    Rope = 1,
}

/// Lifecycle state of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineState {
    /// Travelling toward the target.
    Flying,
    /// Anchored to a surface and applying tension.
    Attached,
    /// Terminal. No further force is applied.
    Destroyed(DestroyReason),
}

/// Where the launch ray says the line will land.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactPrediction {
    /// Contact point on the first solid surface.
    pub point: Vec2,
    /// Surface normal at the contact.
    pub normal: Vec2,
    /// Distance from the emitter.
    pub distance: f32,
    /// `distance / travel_speed`.
    pub time_to_impact: f32,
    /// Whether the surface accepts lines.
    pub grippable: bool,
    /// Surface collider.
    pub collider: ColliderId,
}

/// State change reported by [`GrapplingLine::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineTransition {
    /// The line anchored this tick.
    Attached {
        /// Anchor point.
        anchor: Vec2,
        /// Rope constraint length, `None` for Web.
        length: Option<f32>,
    },
    /// The line was destroyed this tick.
    Destroyed(DestroyReason),
}

/// A grapple line owned by one character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrapplingLine {
    kind: LineKind,
    state: LineState,
    owner: BodyId,
    /// Launch position, fixed for the flight.
    emitter: Vec2,
    direction: Vec2,
    tip: Vec2,
    velocity: Vec2,
    anchor: Option<Vec2>,
    /// Constraint length (Rope only).
    length: Option<f32>,
    prediction: Option<ImpactPrediction>,
    elapsed: f32,
    traveled: f32,
}

// =============================================================================
// LAUNCH
// =============================================================================

impl GrapplingLine {
    /// Launch a line from `owner` toward `target`.
    ///
    /// Returns `None` if `target` coincides with the owner's position (no
    /// direction to fly in).
    pub fn launch(
        owner: &CharacterBody,
        target: Vec2,
        kind: LineKind,
        world: &dyn CollisionQuery,
        config: &PhysicsConfig,
    ) -> Option<Self> {
        let emitter = owner.position;
        let (direction, _) = direction_and_length(target - emitter)?;
        let speed = config.line_travel_speed;

        let prediction = first_solid_hit(world, emitter, direction, config.max_line_length).map(
            |hit| ImpactPrediction {
                point: hit.point,
                normal: hit.normal,
                distance: hit.distance,
                time_to_impact: hit.distance / speed,
                grippable: hit.collider.is_grippable_solid(),
                collider: hit.collider.id,
            },
        );

        Some(Self {
            kind,
            state: LineState::Flying,
            owner: owner.id,
            emitter,
            direction,
            tip: emitter,
            velocity: direction * speed,
            anchor: None,
            length: None,
            prediction,
            elapsed: 0.0,
            traveled: 0.0,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Tension model.
    #[inline]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> LineState {
        self.state
    }

    /// Owning body.
    #[inline]
    pub fn owner(&self) -> BodyId {
        self.owner
    }

    /// Launch position.
    #[inline]
    pub fn emitter(&self) -> Vec2 {
        self.emitter
    }

    /// Current tip position (equals the anchor once attached).
    #[inline]
    pub fn tip(&self) -> Vec2 {
        self.tip
    }

    /// Travel velocity (zero once attached or destroyed).
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Anchor point, set once attached.
    #[inline]
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Rope constraint length.
    #[inline]
    pub fn length(&self) -> Option<f32> {
        self.length
    }

    /// Launch-time impact prediction.
    #[inline]
    pub fn prediction(&self) -> Option<&ImpactPrediction> {
        self.prediction.as_ref()
    }

    /// Time spent flying (seconds).
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Distance the tip has flown from the emitter.
    #[inline]
    pub fn traveled(&self) -> f32 {
        self.traveled
    }

    /// Check if attached.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == LineState::Attached
    }

    /// Check if the line is still Flying or Attached.
    #[inline]
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, LineState::Destroyed(_))
    }

    /// Destroy the line. Returns `None` if it was already destroyed.
    pub fn destroy(&mut self, reason: DestroyReason) -> Option<LineTransition> {
        if !self.is_alive() {
            return None;
        }
        self.state = LineState::Destroyed(reason);
        self.velocity = Vec2::ZERO;
        Some(LineTransition::Destroyed(reason))
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the line by one tick against its owner.
    pub fn tick(
        &mut self,
        owner: &mut CharacterBody,
        config: &PhysicsConfig,
    ) -> Option<LineTransition> {
        match self.state {
            LineState::Destroyed(_) => None,
            _ if owner.id != self.owner => self.destroy(DestroyReason::OwnerMismatch),
            LineState::Flying => self.tick_flying(owner, config),
            LineState::Attached => self.tick_attached(owner, config),
        }
    }

    fn tick_flying(
        &mut self,
        owner: &mut CharacterBody,
        config: &PhysicsConfig,
    ) -> Option<LineTransition> {
        let dt = config.tick_duration;
        let speed = config.line_travel_speed;

        match self.prediction {
            Some(prediction) => {
                let remaining = prediction.time_to_impact - self.elapsed;
                if remaining <= dt + TIME_EPSILON {
                    // Land exactly on the predicted point.
                    self.elapsed = prediction.time_to_impact;
                    self.traveled = prediction.distance;
                    self.tip = prediction.point;

                    if prediction.grippable {
                        self.attach(owner, prediction.point, config)
                    } else {
                        self.destroy(DestroyReason::NotGrippable)
                    }
                } else {
                    self.elapsed += dt;
                    self.traveled = (self.elapsed * speed).min(prediction.distance);
                    self.tip = self.emitter + self.direction * self.traveled;
                    None
                }
            }
            None => {
                self.elapsed += dt;
                self.traveled = (self.elapsed * speed).min(config.max_line_length);
                self.tip = self.emitter + self.direction * self.traveled;

                if self.traveled >= config.max_line_length {
                    self.destroy(DestroyReason::MaxRange)
                } else {
                    None
                }
            }
        }
    }

    fn attach(
        &mut self,
        owner: &mut CharacterBody,
        anchor: Vec2,
        config: &PhysicsConfig,
    ) -> Option<LineTransition> {
        let Some((axis, distance)) = direction_and_length(anchor - owner.position) else {
            return self.destroy(DestroyReason::TooShort);
        };
        if distance < config.min_attached_length {
            return self.destroy(DestroyReason::TooShort);
        }

        self.state = LineState::Attached;
        self.anchor = Some(anchor);
        self.velocity = Vec2::ZERO;

        match self.kind {
            LineKind::Rope => {
                self.length = Some(distance);
                // The owner has already moved this tick; outward motion would
                // stretch the rope before the constraint first runs.
                let (radial, _) = decompose(owner.velocity, axis);
                if radial < 0.0 {
                    owner.velocity -= axis * radial;
                }
            }
            LineKind::Web => {
                let (radial, tangential) = decompose(owner.velocity, axis);
                let retained = tangential * config.web_attach_tangent_retention;
                owner.velocity = axis * radial + axis.perp() * retained;
            }
        }

        Some(LineTransition::Attached {
            anchor,
            length: self.length,
        })
    }

    fn tick_attached(
        &mut self,
        owner: &mut CharacterBody,
        config: &PhysicsConfig,
    ) -> Option<LineTransition> {
        let Some(anchor) = self.anchor else {
            return self.destroy(DestroyReason::TooShort);
        };

        let to_anchor = anchor - owner.position;
        let distance = to_anchor.length();
        if !distance.is_finite() || distance < config.min_attached_length {
            return self.destroy(DestroyReason::TooShort);
        }

        // Owner on top of the anchor: no direction, skip this tick.
        let (inward, distance) = direction_and_length(to_anchor)?;

        match self.kind {
            LineKind::Web => {
                owner.velocity += inward * config.web_force * config.tick_duration;
            }
            LineKind::Rope => {
                if let Some(length) = self.length {
                    apply_rope_constraint(owner, anchor, inward, distance, length, config);
                }
            }
        }

        None
    }

    /// Hash this line's state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.kind as u8);
        match self.state {
            LineState::Flying => hasher.update_u8(0),
            LineState::Attached => hasher.update_u8(1),
            LineState::Destroyed(reason) => {
                hasher.update_u8(2);
                hasher.update_u8(reason as u8);
            }
        }
        hasher.update_u32(self.owner.0);
        hasher.update_vec2(self.emitter);
        hasher.update_vec2(self.tip);
        hasher.update_vec2(self.velocity);
        hasher.update_vec2(self.anchor.unwrap_or(Vec2::ZERO));
        hasher.update_f32(self.length.unwrap_or(0.0));
        hasher.update_f32(self.elapsed);
    }
}

// =============================================================================
// ROPE
// =============================================================================

/// Inextensible-string constraint, applied to the owner's velocity.
///
/// In order: swing input along the tangent, then a one-sided clamp so the
/// next integration cannot carry the owner past the allowed radius, then a
/// proportional pull if the stretch exceeds the drift tolerance.
fn apply_rope_constraint(
    owner: &mut CharacterBody,
    anchor: Vec2,
    inward: Vec2,
    distance: f32,
    length: f32,
    config: &PhysicsConfig,
) {
    let dt = config.tick_duration;
    let excess = distance - length;

    // Tangent oriented so positive input swings toward +x.
    if owner.move_input != 0.0 {
        let mut tangent = inward.perp();
        if tangent.x < 0.0 {
            tangent = -tangent;
        }
        owner.velocity += tangent * owner.move_input * config.rope_swing_gain * dt;
    }

    // Existing stretch is only bled off by the position bias each tick.
    let allowed = length + excess.max(0.0) * (1.0 - config.rope_position_bias);
    let predicted = owner.position + owner.velocity * dt;
    if let Some((outward, predicted_distance)) = direction_and_length(predicted - anchor) {
        if predicted_distance > allowed {
            let target = anchor + outward * allowed;
            owner.velocity = (target - owner.position) / dt;
        }
    }

    if excess > length * config.rope_drift_tolerance {
        owner.velocity += inward * config.rope_correction_gain * excess * dt;
    }
}
