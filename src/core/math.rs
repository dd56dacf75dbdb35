//! 2D Vector Helpers
//!
//! Small scalar/vector operations shared by the controller and the grapple
//! line. Built on `glam::Vec2`; everything here is pure and allocation-free.

use glam::Vec2;

/// Distances below this are treated as zero when normalizing.
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Tolerance for time comparisons (seconds).
pub const TIME_EPSILON: f32 = 1e-5;

/// Move `current` toward `target` by at most `max_delta`.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Normalize `v`, returning the unit direction and the original length.
///
/// Returns `None` when the length is below [`DIRECTION_EPSILON`] or not finite.
#[inline]
pub fn direction_and_length(v: Vec2) -> Option<(Vec2, f32)> {
    let length = v.length();
    if !length.is_finite() || length < DIRECTION_EPSILON {
        return None;
    }
    Some((v / length, length))
}

/// Remove the component of `velocity` pointing into a surface.
///
/// Only velocity moving *into* the surface (negative dot with the normal) is
/// removed, so a body sliding away from a wall keeps its separation speed.
#[inline]
pub fn clip_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into < 0.0 {
        velocity - normal * into
    } else {
        velocity
    }
}

/// Split `velocity` into components along `axis` and along its left-hand
/// perpendicular. `axis` must be unit length.
#[inline]
pub fn decompose(velocity: Vec2, axis: Vec2) -> (f32, f32) {
    (velocity.dot(axis), velocity.dot(axis.perp()))
}

/// Treat non-finite input as zero.
#[inline]
pub fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_towards_reaches_target() {
        assert_eq!(move_towards(0.0, 10.0, 1.0), 1.0);
        assert_eq!(move_towards(9.5, 10.0, 1.0), 10.0);
        assert_eq!(move_towards(0.0, -10.0, 2.5), -2.5);
        assert_eq!(move_towards(3.0, 3.0, 0.0), 3.0);
    }

    #[test]
    fn test_direction_and_length() {
        let (dir, len) = direction_and_length(Vec2::new(3.0, 4.0)).unwrap();
        assert!((len - 5.0).abs() < 1e-6);
        assert!((dir.length() - 1.0).abs() < 1e-6);

        assert!(direction_and_length(Vec2::ZERO).is_none());
        assert!(direction_and_length(Vec2::splat(DIRECTION_EPSILON * 0.1)).is_none());
        assert!(direction_and_length(Vec2::new(f32::NAN, 1.0)).is_none());
    }

    #[test]
    fn test_clip_velocity_into_floor() {
        let clipped = clip_velocity(Vec2::new(4.0, -6.0), Vec2::Y);
        assert_eq!(clipped, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn test_clip_velocity_leaves_separating_motion() {
        let v = Vec2::new(4.0, 6.0);
        assert_eq!(clip_velocity(v, Vec2::Y), v);
    }

    #[test]
    fn test_decompose_recombines() {
        let axis = Vec2::new(0.6, 0.8);
        let v = Vec2::new(-2.0, 5.0);
        let (radial, tangential) = decompose(v, axis);
        let rebuilt = axis * radial + axis.perp() * tangential;
        assert!((rebuilt - v).length() < 1e-5);
    }
}
