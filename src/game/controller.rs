//! Character Controller
//!
//! Fixed-step movement and collision resolution for the controllable
//! character. The controller exclusively owns its [`CharacterBody`] and at
//! most one [`GrapplingLine`].
//!
//! ## Tick Order
//!
//! 1. Contact probe (four short box casts)
//! 2. Contact correction (no velocity into active contacts)
//! 3. Horizontal integration
//! 4. Jump buffer
//! 5. Gravity
//! 6. Speed clamp
//! 7. Swept integration and slide resolution
//! 8. Trigger contacts (hazard, checkpoint, exit)
//!
//! The line is ticked separately through [`CharacterController::tick_line`]
//! after the controller tick, so line forces land on the next tick.

use glam::Vec2;
use tracing::{debug, info};

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::collision::{solid_box_cast, ColliderId, CollisionQuery, SurfaceKind};
use crate::core::hash::StateHasher;
use crate::core::math::{clip_velocity, direction_and_length, move_towards};
use crate::game::body::{BodyId, CharacterBody, ContactFlags};
use crate::game::config::PhysicsConfig;
use crate::game::events::{DestroyReason, GameEvent, GameEventData};
use crate::game::input::InputFrame;
use crate::game::line::{GrapplingLine, LineKind, LineTransition};
use crate::game::session::SessionHooks;

/// Per-tick collaborators passed into the controller.
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    /// Current tick number (stamped on events).
    pub tick: u32,
    /// Level geometry.
    pub world: &'a dyn CollisionQuery,
    /// Physics tunables.
    pub config: &'a PhysicsConfig,
}

impl<'a> TickContext<'a> {
    /// Bundle the collaborators for one tick.
    pub fn new(tick: u32, world: &'a dyn CollisionQuery, config: &'a PhysicsConfig) -> Self {
        Self {
            tick,
            world,
            config,
        }
    }
}

/// Owns one character body and its optional grapple line.
#[derive(Clone, Debug)]
pub struct CharacterController {
    body: CharacterBody,
    /// Only ever holds a live (Flying/Attached) line.
    line: Option<GrapplingLine>,
    /// Trigger colliders overlapped at the end of the last tick.
    touching: Vec<ColliderId>,
    pending_events: Vec<GameEvent>,
    now: u32,
}

impl CharacterController {
    /// Create a controller with a body at rest at `position`.
    pub fn new(id: BodyId, position: Vec2) -> Self {
        Self {
            body: CharacterBody::new(id, position),
            line: None,
            touching: Vec::new(),
            pending_events: Vec::new(),
            now: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Body state.
    #[inline]
    pub fn body(&self) -> &CharacterBody {
        &self.body
    }

    /// Body identity.
    #[inline]
    pub fn id(&self) -> BodyId {
        self.body.id
    }

    /// Get position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position()
    }

    /// Set position (external respawn/teleport).
    pub fn set_position(&mut self, position: Vec2) {
        self.body.set_position(position);
    }

    /// Get velocity.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.body.velocity()
    }

    /// Set velocity (external respawn/knockback).
    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.body.set_velocity(velocity);
    }

    /// Contact flags from the last tick.
    #[inline]
    pub fn contacts(&self) -> ContactFlags {
        self.body.contacts
    }

    /// Check if the body is dead.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.body.dead
    }

    /// The live line, if any.
    #[inline]
    pub fn line(&self) -> Option<&GrapplingLine> {
        self.line.as_ref()
    }

    /// Kind of the attached line, if one is attached.
    pub fn attached_kind(&self) -> Option<LineKind> {
        self.line
            .as_ref()
            .filter(|line| line.is_attached())
            .map(GrapplingLine::kind)
    }

    /// Check if any line is attached.
    #[inline]
    pub fn has_attached_line(&self) -> bool {
        self.attached_kind().is_some()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    fn push_event(&mut self, data: GameEventData) {
        let event = GameEvent::new(self.now, self.body.id, data);
        self.pending_events.push(event);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Apply one input frame. Dead bodies ignore input.
    pub fn apply_input(&mut self, input: &InputFrame, ctx: &TickContext<'_>) {
        self.now = ctx.tick;
        if self.body.dead {
            return;
        }

        self.body.move_input = input.horizontal();
        if input.jump {
            self.body.jump_buffer = ctx.config.jump_buffer_duration;
        }
        if input.cancel {
            self.cancel_line();
        }
        if let Some(fire) = input.fire {
            if ctx.config.refire_replaces_line {
                self.cancel_line();
            }
            self.fire_line(fire.target, fire.kind, ctx);
        }
    }

    /// Launch a line toward `target`.
    ///
    /// Ignored (returns `false`) while a line already exists, while dead, or
    /// when `target` is the body's own position.
    pub fn fire_line(&mut self, target: Vec2, kind: LineKind, ctx: &TickContext<'_>) -> bool {
        self.now = ctx.tick;
        if self.body.dead || self.line.is_some() {
            return false;
        }

        let Some(line) = GrapplingLine::launch(&self.body, target, kind, ctx.world, ctx.config)
        else {
            return false;
        };

        let predicted = line.prediction().map(|prediction| prediction.point);
        debug!("{} fired {:?} toward {} (predicted: {:?})", self.body.id, kind, target, predicted);
        self.push_event(GameEventData::LineFired {
            kind,
            target,
            predicted,
        });
        self.line = Some(line);
        true
    }

    /// Destroy the current line immediately. Returns `false` if there was none.
    pub fn cancel_line(&mut self) -> bool {
        self.destroy_line(DestroyReason::Cancelled)
    }

    fn destroy_line(&mut self, reason: DestroyReason) -> bool {
        let Some(mut line) = self.line.take() else {
            return false;
        };
        match line.destroy(reason) {
            Some(transition) => {
                self.report_line(line.kind(), transition);
                true
            }
            None => false,
        }
    }

    fn report_line(&mut self, kind: LineKind, transition: LineTransition) {
        match transition {
            LineTransition::Attached { anchor, length } => {
                debug!("{} {:?} attached at {} (length: {:?})", self.body.id, kind, anchor, length);
                self.push_event(GameEventData::LineAttached {
                    kind,
                    anchor,
                    length,
                });
            }
            LineTransition::Destroyed(reason) => {
                debug!("{} {:?} destroyed: {:?}", self.body.id, kind, reason);
                self.push_event(GameEventData::LineDestroyed { kind, reason });
            }
        }
    }

    /// Kill the body. Returns `false` if it was already dead.
    ///
    /// Velocity is zeroed and any line is destroyed.
    pub fn kill(&mut self) -> bool {
        if !self.body.kill() {
            return false;
        }
        self.destroy_line(DestroyReason::OwnerDied);

        let position = self.body.position;
        info!("{} died at ({:.2}, {:.2})", self.body.id, position.x, position.y);
        self.push_event(GameEventData::Died { position });
        true
    }

    /// Bring the body back at `position` with velocity and contacts cleared.
    pub fn respawn(&mut self, position: Vec2) {
        self.destroy_line(DestroyReason::Cancelled);
        self.body.respawn(position);
        self.touching.clear();
        self.push_event(GameEventData::Respawned {
            position: self.body.position,
        });
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Run one controller tick.
    pub fn tick(&mut self, ctx: &TickContext<'_>, hooks: &mut dyn SessionHooks) {
        self.now = ctx.tick;
        if self.body.dead {
            return;
        }
        let config = ctx.config;
        let was_grounded = self.body.contacts.grounded;

        // 1. Contact probe
        self.probe_contacts(ctx.world, config);

        // 2. Contact correction
        self.correct_contact_velocity();

        // 3. Horizontal integration
        self.integrate_horizontal(config);

        // 4. Jump buffer
        self.update_jump(config);

        // 5. Gravity
        let web_attached = self.attached_kind() == Some(LineKind::Web);
        if !self.body.contacts.grounded && !web_attached {
            self.body.velocity.y -= config.gravity * config.tick_duration;
        }

        // 6. Speed clamp
        self.clamp_speed(config);

        // Input may have turned velocity back into a contact.
        self.correct_contact_velocity();

        // 7. Swept integration + resolution
        self.resolve_motion(ctx.world, config);

        if !was_grounded && self.body.contacts.grounded {
            self.push_event(GameEventData::Landed {
                position: self.body.position,
            });
        }

        #[cfg(feature = "debug-tracing")]
        trace!(
            tick = ctx.tick,
            position = ?self.body.position,
            velocity = ?self.body.velocity,
            contacts = self.body.contacts.bits(),
            "controller tick"
        );

        // 8. Trigger contacts
        self.process_triggers(ctx.world, config, hooks);
    }

    /// Advance the line (if any) against the body.
    ///
    /// Destroyed lines are dropped in the same call.
    pub fn tick_line(&mut self, ctx: &TickContext<'_>) {
        self.now = ctx.tick;
        let Some(mut line) = self.line.take() else {
            return;
        };

        if let Some(transition) = line.tick(&mut self.body, ctx.config) {
            self.report_line(line.kind(), transition);
        }
        if line.is_alive() {
            self.line = Some(line);
        }
    }

    /// Clamp speed to the cap, widened while a line is attached.
    pub fn clamp_speed(&mut self, config: &PhysicsConfig) {
        let cap = config.speed_cap(self.has_attached_line());
        self.body.velocity = self.body.velocity.clamp_length_max(cap);
    }

    fn probe_contacts(&mut self, world: &dyn CollisionQuery, config: &PhysicsConfig) {
        let size = config.collider_size;
        let skin = config.skin_width;
        let reach = config.contact_probe_distance;
        let position = self.body.position;

        // Probes are narrowed along the side axis so a wall does not read as floor.
        let vertical = Vec2::new((size.x - 2.0 * skin).max(skin), size.y);
        let horizontal = Vec2::new(size.x, (size.y - 2.0 * skin).max(skin));

        let grounded = solid_box_cast(world, position, vertical, Vec2::NEG_Y, reach)
            .is_some_and(|hit| hit.normal.y >= config.ground_normal_threshold);
        let ceilinged = solid_box_cast(world, position, vertical, Vec2::Y, reach).is_some();
        let walled_left = solid_box_cast(world, position, horizontal, Vec2::NEG_X, reach).is_some();
        let walled_right = solid_box_cast(world, position, horizontal, Vec2::X, reach).is_some();

        self.body.contacts = ContactFlags {
            grounded,
            ceilinged,
            walled_left,
            walled_right,
        };
    }

    fn correct_contact_velocity(&mut self) {
        let contacts = self.body.contacts;
        let velocity = &mut self.body.velocity;

        if (contacts.grounded && velocity.y < 0.0) || (contacts.ceilinged && velocity.y > 0.0) {
            velocity.y = 0.0;
        }
        if (contacts.walled_left && velocity.x < 0.0) || (contacts.walled_right && velocity.x > 0.0)
        {
            velocity.x = 0.0;
        }

        // Squeezed between opposite contacts.
        if contacts.grounded && contacts.ceilinged {
            velocity.y = 0.0;
        }
        if contacts.walled_left && contacts.walled_right {
            velocity.x = 0.0;
        }
    }

    fn integrate_horizontal(&mut self, config: &PhysicsConfig) {
        let dt = config.tick_duration;
        let target = self.body.move_input * config.max_move_speed;
        let on_rope = self.attached_kind() == Some(LineKind::Rope);

        let accel = if on_rope {
            config.rope_accel
        } else if self.body.contacts.grounded {
            config.ground_accel
        } else {
            config.air_accel
        };

        let vx = move_towards(self.body.velocity.x, target, accel * dt);
        if on_rope {
            // Swinging input may slow or redirect, never speed up.
            let candidate = Vec2::new(vx, self.body.velocity.y);
            if candidate.length_squared() > self.body.velocity.length_squared() {
                return;
            }
        }
        self.body.velocity.x = vx;
    }

    fn update_jump(&mut self, config: &PhysicsConfig) {
        let contacts = self.body.contacts;
        if self.body.jump_buffer > 0.0 && contacts.grounded && !contacts.ceilinged {
            self.body.velocity.y = config.jump_speed;
            self.body.contacts.grounded = false;
            self.body.jump_buffer = 0.0;
            self.push_event(GameEventData::Jumped);
            return;
        }
        self.body.jump_buffer = (self.body.jump_buffer - config.tick_duration).max(0.0);
    }

    fn resolve_motion(&mut self, world: &dyn CollisionQuery, config: &PhysicsConfig) {
        let size = config.collider_size;
        let started_inside = overlaps_solid(world, self.body.position, size);
        let mut remaining = self.body.velocity * config.tick_duration;

        for _ in 0..config.max_slide_iterations {
            let Some((direction, distance)) = direction_and_length(remaining) else {
                break;
            };

            let target = self.body.position + remaining;
            if !overlaps_solid(world, target, size) {
                self.body.position = target;
                break;
            }

            // Roll back and find the safe travel distance.
            let Some(hit) = solid_box_cast(world, self.body.position, size, direction, distance)
            else {
                if started_inside {
                    self.body.position = target;
                }
                break;
            };

            let travel = (hit.distance - config.skin_width).max(0.0);
            self.body.position += direction * travel;
            self.classify_contact(hit.normal, config);

            self.body.velocity = clip_velocity(self.body.velocity, hit.normal);
            remaining = clip_velocity(direction * (distance - travel), hit.normal);
        }
    }

    fn classify_contact(&mut self, normal: Vec2, config: &PhysicsConfig) {
        let contacts = &mut self.body.contacts;
        if normal.y >= config.ground_normal_threshold {
            contacts.grounded = true;
        } else if normal.y <= -config.ground_normal_threshold {
            contacts.ceilinged = true;
        } else if normal.x > 0.0 {
            contacts.walled_left = true;
        } else if normal.x < 0.0 {
            contacts.walled_right = true;
        }
    }

    fn process_triggers(
        &mut self,
        world: &dyn CollisionQuery,
        config: &PhysicsConfig,
        hooks: &mut dyn SessionHooks,
    ) {
        let mut overlapping: Vec<_> = world
            .box_overlap(self.body.position, config.collider_size)
            .into_iter()
            .filter(|collider| collider.kind.is_trigger())
            .collect();
        // Hazards last: a death ends processing, other contacts still count.
        overlapping.sort_by_key(|collider| (collider.kind == SurfaceKind::Hazard, collider.id));

        let previous = std::mem::take(&mut self.touching);
        let id = self.body.id;

        for collider in &overlapping {
            if self.body.dead {
                break;
            }
            if previous.contains(&collider.id) {
                continue;
            }
            match collider.kind {
                SurfaceKind::Hazard => {
                    self.kill();
                    hooks.on_hazard_contact(id);
                }
                SurfaceKind::Checkpoint => {
                    self.push_event(GameEventData::CheckpointReached {
                        checkpoint: collider.id,
                    });
                    hooks.on_checkpoint_contact(id, collider.id, collider.center);
                }
                SurfaceKind::Exit => {
                    self.push_event(GameEventData::ExitReached { exit: collider.id });
                    hooks.on_exit_contact(id, collider.id);
                }
                SurfaceKind::Solid | SurfaceKind::Other => {}
            }
        }

        if !self.body.dead {
            self.touching = overlapping.iter().map(|collider| collider.id).collect();
        }
    }

    /// Hash controller state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        self.body.hash_into(hasher);
        match &self.line {
            Some(line) => {
                hasher.update_bool(true);
                line.hash_into(hasher);
            }
            None => hasher.update_bool(false),
        }
    }
}

fn overlaps_solid(world: &dyn CollisionQuery, center: Vec2, size: Vec2) -> bool {
    world
        .box_overlap(center, size)
        .iter()
        .any(|collider| collider.kind.is_solid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{LevelGeometry, NoCollision};
    use crate::game::session::GameSession;

    /// Floor with its top face at y = 0.
    fn floor_level() -> LevelGeometry {
        let mut level = LevelGeometry::new();
        level.add_solid(Vec2::new(0.0, -0.5), Vec2::new(50.0, 0.5));
        level
    }

    fn run(
        controller: &mut CharacterController,
        world: &dyn CollisionQuery,
        config: &PhysicsConfig,
        input: InputFrame,
        ticks: u32,
    ) {
        for _ in 0..ticks {
            let tick = controller.now + 1;
            let ctx = TickContext::new(tick, world, config);
            controller.apply_input(&input, &ctx);
            controller.tick(&ctx, &mut ());
            controller.tick_line(&ctx);
            controller.clamp_speed(config);
        }
    }

    #[test]
    fn test_falls_and_lands() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 3.0));

        run(&mut controller, &level, &config, InputFrame::new(), 120);

        assert!(controller.contacts().grounded);
        assert_eq!(controller.velocity().y, 0.0);
        let bottom = controller.position().y - config.half_extents().y;
        assert!(bottom >= -1e-4 && bottom <= config.contact_probe_distance);

        let events = controller.take_events();
        assert!(events.iter().any(|e| matches!(e.data, GameEventData::Landed { .. })));
    }

    #[test]
    fn test_free_fall_without_geometry() {
        let config = PhysicsConfig::default();
        let mut controller = CharacterController::new(BodyId(1), Vec2::ZERO);
        run(&mut controller, &NoCollision, &config, InputFrame::new(), 10);

        assert!(!controller.contacts().any());
        assert!(controller.velocity().y < 0.0);
        assert!(controller.position().y < 0.0);
    }

    #[test]
    fn test_walks_toward_input() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));

        run(&mut controller, &level, &config, InputFrame::with_movement(1.0), 60);
        assert!((controller.velocity().x - config.max_move_speed).abs() < 1e-4);
        assert!(controller.position().x > 0.0);
        assert!(controller.contacts().grounded);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));
        run(&mut controller, &level, &config, InputFrame::new(), 5);
        controller.take_events();

        run(&mut controller, &level, &config, InputFrame::new().jumping(), 1);
        assert!(!controller.contacts().grounded);
        assert!(controller.velocity().y > 0.0);
        let events = controller.take_events();
        assert!(events.iter().any(|e| e.data == GameEventData::Jumped));
    }

    #[test]
    fn test_jump_buffer_fires_on_landing() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        // Just above the floor; lands within the buffer window.
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.5));

        run(&mut controller, &level, &config, InputFrame::new().jumping(), 1);
        run(&mut controller, &level, &config, InputFrame::new(), 5);

        let events = controller.take_events();
        assert!(events.iter().any(|e| e.data == GameEventData::Jumped));
    }

    #[test]
    fn test_expired_jump_buffer_is_dropped() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 6.0));

        run(&mut controller, &level, &config, InputFrame::new().jumping(), 1);
        run(&mut controller, &level, &config, InputFrame::new(), 120);

        let events = controller.take_events();
        assert!(!events.iter().any(|e| e.data == GameEventData::Jumped));
        assert!(controller.contacts().grounded);
    }

    #[test]
    fn test_wall_stops_horizontal_motion() {
        let config = PhysicsConfig::default();
        let mut level = floor_level();
        level.add_solid(Vec2::new(3.5, 2.0), Vec2::new(0.5, 2.0));
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));

        run(&mut controller, &level, &config, InputFrame::with_movement(1.0), 90);

        let right_edge = controller.position().x + config.half_extents().x;
        assert!(right_edge <= 3.0 + 1e-4);
        assert!(controller.contacts().walled_right);
        assert_eq!(controller.velocity().x, 0.0);
        assert!(controller.contacts().grounded);
    }

    #[test]
    fn test_thin_gap_squeeze() {
        let config = PhysicsConfig::default();
        let mut level = floor_level();
        // Ceiling bottom 0.82: gap of one skin above and below.
        level.add_solid(Vec2::new(0.0, 1.32), Vec2::new(50.0, 0.5));
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));
        controller.set_velocity(Vec2::new(0.0, -5.0));

        let input = InputFrame::with_movement(1.0).jumping();
        for _ in 0..30 {
            run(&mut controller, &level, &config, input, 1);
            let contacts = controller.contacts();
            assert!(contacts.grounded);
            assert!(contacts.ceilinged);
            assert_eq!(controller.velocity().y, 0.0);
        }
        assert!(controller.position().x > 0.0);
        let events = controller.take_events();
        assert!(!events.iter().any(|e| e.data == GameEventData::Jumped));
    }

    #[test]
    fn test_fire_ignored_while_line_exists() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let world: &dyn CollisionQuery = &level;
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 5.0));
        let ctx = TickContext::new(1, world, &config);

        assert!(controller.fire_line(Vec2::new(0.0, 0.0), LineKind::Rope, &ctx));
        assert!(!controller.fire_line(Vec2::new(3.0, 0.0), LineKind::Web, &ctx));
        assert_eq!(controller.line().map(GrapplingLine::kind), Some(LineKind::Rope));

        assert!(controller.cancel_line());
        assert!(controller.line().is_none());
        assert!(!controller.cancel_line());
    }

    #[test]
    fn test_refire_replaces_line() {
        let config = PhysicsConfig::default();
        let level = floor_level();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 5.0));
        let ctx = TickContext::new(1, &level, &config);

        controller.apply_input(&InputFrame::new().firing(Vec2::ZERO, LineKind::Rope), &ctx);
        controller.apply_input(&InputFrame::new().firing(Vec2::ZERO, LineKind::Web), &ctx);

        assert_eq!(controller.line().map(GrapplingLine::kind), Some(LineKind::Web));
        let events = controller.take_events();
        assert!(events.iter().any(|e| matches!(
            e.data,
            GameEventData::LineDestroyed {
                reason: DestroyReason::Cancelled,
                ..
            }
        )));
    }

    #[test]
    fn test_hazard_kills_and_destroys_line() {
        let config = PhysicsConfig::default();
        let mut level = LevelGeometry::new();
        level.add_hazard(Vec2::new(0.0, -0.5), Vec2::new(5.0, 0.5));
        level.add_solid(Vec2::new(0.0, 10.5), Vec2::new(5.0, 0.5));
        let mut session = GameSession::new(Vec2::new(0.0, 3.0), 60);
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 1.0));

        let ctx = TickContext::new(1, &level, &config);
        assert!(controller.fire_line(Vec2::new(0.0, 10.0), LineKind::Web, &ctx));

        for tick in 1..=60 {
            let ctx = TickContext::new(tick, &level, &config);
            controller.tick(&ctx, &mut session);
            if controller.is_dead() {
                break;
            }
            // Drop into the hazard.
            controller.set_velocity(Vec2::new(0.0, -10.0));
        }

        assert!(controller.is_dead());
        assert!(controller.line().is_none());
        assert_eq!(controller.velocity(), Vec2::ZERO);
        assert_eq!(session.deaths(), 1);

        let events = controller.take_events();
        assert!(events.iter().any(GameEvent::is_death));
        assert!(events.iter().any(|e| matches!(
            e.data,
            GameEventData::LineDestroyed {
                reason: DestroyReason::OwnerDied,
                ..
            }
        )));
    }

    #[test]
    fn test_dead_body_ignores_input_and_does_not_move() {
        let config = PhysicsConfig::default();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(2.0, 2.0));
        assert!(controller.kill());
        assert!(!controller.kill());

        run(
            &mut controller,
            &NoCollision,
            &config,
            InputFrame::with_movement(1.0).jumping().firing(Vec2::ZERO, LineKind::Web),
            10,
        );
        assert_eq!(controller.position(), Vec2::new(2.0, 2.0));
        assert_eq!(controller.velocity(), Vec2::ZERO);
        assert!(controller.line().is_none());

        controller.respawn(Vec2::new(5.0, 5.0));
        assert!(!controller.is_dead());
        assert_eq!(controller.position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_checkpoint_is_edge_triggered() {
        let config = PhysicsConfig::default();
        let mut level = floor_level();
        let checkpoint = level.add_checkpoint(Vec2::new(0.0, 0.75), Vec2::new(0.25, 0.75));
        let mut session = GameSession::new(Vec2::ZERO, 60);
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));

        for tick in 1..=10 {
            let ctx = TickContext::new(tick, &level, &config);
            controller.tick(&ctx, &mut session);
        }

        let reached: Vec<_> = controller
            .take_events()
            .into_iter()
            .filter(|e| matches!(e.data, GameEventData::CheckpointReached { .. }))
            .collect();
        assert_eq!(reached.len(), 1);
        assert_eq!(session.active_checkpoint().map(|c| c.id), Some(checkpoint));
    }

    #[test]
    fn test_checkpoint_counts_when_hazard_touched_same_tick() {
        let config = PhysicsConfig::default();
        let mut level = floor_level();
        // Hazard gets the lower id.
        level.add_hazard(Vec2::new(0.0, 0.25), Vec2::new(0.25, 0.25));
        let checkpoint = level.add_checkpoint(Vec2::new(0.0, 0.75), Vec2::new(0.25, 0.75));
        let mut session = GameSession::new(Vec2::new(-5.0, 0.41), 60);
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 0.41));

        let ctx = TickContext::new(1, &level, &config);
        controller.tick(&ctx, &mut session);

        assert!(controller.is_dead());
        assert_eq!(session.deaths(), 1);
        assert_eq!(session.active_checkpoint().map(|c| c.id), Some(checkpoint));

        let events = controller.take_events();
        assert!(events.iter().any(GameEvent::is_death));
        assert!(events
            .iter()
            .any(|e| e.data == GameEventData::CheckpointReached { checkpoint }));
    }

    #[test]
    fn test_speed_cap_holds() {
        let config = PhysicsConfig::default();
        let mut controller = CharacterController::new(BodyId(1), Vec2::new(0.0, 100.0));
        controller.set_velocity(Vec2::new(80.0, -80.0));

        run(&mut controller, &NoCollision, &config, InputFrame::new(), 1);
        assert!(controller.velocity().length() <= config.max_speed + 1e-4);
    }
}
