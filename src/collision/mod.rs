//! Collision Queries
//!
//! The controller and grapple line never own geometry. They consume a
//! host-provided [`CollisionQuery`] and react to the colliders it reports.
//!
//! # Key Types
//!
//! - [`CollisionQuery`]: ray cast, box overlap and box cast against the level
//! - [`Collider`]: a piece of level geometry with its [`SurfaceKind`]
//! - [`Hit`]: output of a ray or box cast
//! - [`LevelGeometry`]: axis-aligned reference implementation
//!
//! Classification happens once, in the collision layer. Call sites match on
//! [`SurfaceKind`] and never inspect names or tags.

mod world;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use world::{BlockDescription, LevelDescription, LevelError, LevelGeometry};

/// Identifier of a collider inside its collision world.
pub type ColliderId = u32;

/// What a collider is, for gameplay purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    /// Blocking level geometry. The only kind that stops movement.
    #[default]
    Solid,
    /// Kills the character on contact.
    Hazard,
    /// Respawn point, activated on contact.
    Checkpoint,
    /// Level exit.
    Exit,
    /// Non-blocking decoration; ignored by the core.
    Other,
}

impl SurfaceKind {
    /// Check if this kind blocks movement.
    #[inline]
    pub fn is_solid(self) -> bool {
        matches!(self, SurfaceKind::Solid)
    }

    /// Check if touching this kind has a gameplay side effect.
    #[inline]
    pub fn is_trigger(self) -> bool {
        matches!(
            self,
            SurfaceKind::Hazard | SurfaceKind::Checkpoint | SurfaceKind::Exit
        )
    }
}

/// A collider as reported by a [`CollisionQuery`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Stable identifier (checkpoint / exit id for triggers).
    pub id: ColliderId,
    /// Gameplay classification.
    pub kind: SurfaceKind,
    /// Whether a grapple line may attach to this collider.
    /// Only meaningful for `Solid`.
    pub grippable: bool,
    /// World-space center (used as the respawn point for checkpoints).
    pub center: Vec2,
}

impl Collider {
    /// Solid and eligible for line attachment.
    #[inline]
    pub fn is_grippable_solid(&self) -> bool {
        self.kind.is_solid() && self.grippable
    }
}

/// Result of a ray cast or box cast.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Contact point on the surface.
    pub point: Vec2,
    /// Surface normal at the contact, pointing away from the collider.
    pub normal: Vec2,
    /// Distance traveled along the cast direction before contact.
    pub distance: f32,
    /// What was hit.
    pub collider: Collider,
}

impl Hit {
    /// Reject hits carrying NaN/infinite data from a misbehaving host.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.point.is_finite()
            && self.normal.is_finite()
            && self.distance.is_finite()
            && self.distance >= 0.0
    }
}

/// Geometry queries the simulation consumes.
///
/// Implementations should be pure with respect to the query arguments:
/// the same query against the same geometry returns the same answer.
pub trait CollisionQuery {
    /// Cast a ray and return every hit up to `max_distance`, nearest first.
    ///
    /// `direction` is unit length. Hits of every [`SurfaceKind`] are reported.
    fn ray_cast_all(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Vec<Hit>;

    /// Return every collider overlapping the box (touching does not count).
    fn box_overlap(&self, center: Vec2, size: Vec2) -> Vec<Collider>;

    /// Sweep a box along `direction` and return the first blocking hit.
    ///
    /// Only [`SurfaceKind::Solid`] colliders stop a cast.
    fn box_cast(&self, center: Vec2, size: Vec2, direction: Vec2, max_distance: f32)
        -> Option<Hit>;
}

/// A collision world with nothing in it.
///
/// Stands in when the host has no geometry available: every query reports
/// "no contact / no hit".
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCollision;

impl CollisionQuery for NoCollision {
    fn ray_cast_all(&self, _origin: Vec2, _direction: Vec2, _max_distance: f32) -> Vec<Hit> {
        Vec::new()
    }

    fn box_overlap(&self, _center: Vec2, _size: Vec2) -> Vec<Collider> {
        Vec::new()
    }

    fn box_cast(
        &self,
        _center: Vec2,
        _size: Vec2,
        _direction: Vec2,
        _max_distance: f32,
    ) -> Option<Hit> {
        None
    }
}

/// First well-formed `Solid` hit along a ray.
pub fn first_solid_hit(
    world: &dyn CollisionQuery,
    origin: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<Hit> {
    world
        .ray_cast_all(origin, direction, max_distance)
        .into_iter()
        .filter(Hit::is_well_formed)
        .find(|hit| hit.collider.kind.is_solid() && hit.distance <= max_distance)
}

/// Box cast that discards malformed or non-solid results.
pub fn solid_box_cast(
    world: &dyn CollisionQuery,
    center: Vec2,
    size: Vec2,
    direction: Vec2,
    max_distance: f32,
) -> Option<Hit> {
    world
        .box_cast(center, size, direction, max_distance)
        .filter(|hit| hit.is_well_formed() && hit.collider.kind.is_solid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collider(kind: SurfaceKind) -> Collider {
        Collider {
            id: 0,
            kind,
            grippable: true,
            center: Vec2::ZERO,
        }
    }

    #[test]
    fn test_surface_kind_classification() {
        assert!(SurfaceKind::Solid.is_solid());
        assert!(!SurfaceKind::Solid.is_trigger());
        assert!(SurfaceKind::Hazard.is_trigger());
        assert!(SurfaceKind::Checkpoint.is_trigger());
        assert!(SurfaceKind::Exit.is_trigger());
        assert!(!SurfaceKind::Other.is_trigger());
        assert!(!SurfaceKind::Other.is_solid());
    }

    #[test]
    fn test_grippable_requires_solid() {
        assert!(collider(SurfaceKind::Solid).is_grippable_solid());
        assert!(!collider(SurfaceKind::Hazard).is_grippable_solid());
    }

    #[test]
    fn test_no_collision_reports_nothing() {
        let world = NoCollision;
        assert!(world.ray_cast_all(Vec2::ZERO, Vec2::X, 10.0).is_empty());
        assert!(world.box_overlap(Vec2::ZERO, Vec2::ONE).is_empty());
        assert!(world.box_cast(Vec2::ZERO, Vec2::ONE, Vec2::X, 10.0).is_none());
    }

    #[test]
    fn test_malformed_hit_rejected() {
        let hit = Hit {
            point: Vec2::new(f32::NAN, 0.0),
            normal: Vec2::Y,
            distance: 1.0,
            collider: collider(SurfaceKind::Solid),
        };
        assert!(!hit.is_well_formed());
    }

    struct SkippingHost;

    impl CollisionQuery for SkippingHost {
        fn ray_cast_all(&self, _o: Vec2, _d: Vec2, _m: f32) -> Vec<Hit> {
            vec![
                Hit {
                    point: Vec2::new(1.0, 0.0),
                    normal: Vec2::NEG_X,
                    distance: 1.0,
                    collider: collider(SurfaceKind::Hazard),
                },
                Hit {
                    point: Vec2::new(2.0, 0.0),
                    normal: Vec2::NEG_X,
                    distance: f32::INFINITY,
                    collider: collider(SurfaceKind::Solid),
                },
                Hit {
                    point: Vec2::new(3.0, 0.0),
                    normal: Vec2::NEG_X,
                    distance: 3.0,
                    collider: collider(SurfaceKind::Solid),
                },
            ]
        }

        fn box_overlap(&self, _c: Vec2, _s: Vec2) -> Vec<Collider> {
            Vec::new()
        }

        fn box_cast(&self, _c: Vec2, _s: Vec2, _d: Vec2, _m: f32) -> Option<Hit> {
            None
        }
    }

    #[test]
    fn test_first_solid_hit_skips_triggers_and_garbage() {
        let hit = first_solid_hit(&SkippingHost, Vec2::ZERO, Vec2::X, 10.0).unwrap();
        assert_eq!(hit.distance, 3.0);
    }
}
