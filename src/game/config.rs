//! Physics configuration.
//!
//! Every tunable of the controller and the grapple line lives here.
//! Defaults reproduce the shipped game feel; JSON files may override any
//! subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a [`PhysicsConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON for this config.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Configuration for character and grapple-line physics.
///
/// Units are world units and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // ========================================================================
    // Simulation
    // ========================================================================
    /// Fixed tick duration (seconds).
    pub tick_duration: f32,

    // ========================================================================
    // Body
    // ========================================================================
    /// Full collider width and height.
    pub collider_size: Vec2,

    /// How far the contact probes reach beyond the collider.
    pub contact_probe_distance: f32,

    /// Gap kept between the collider and any surface after resolution.
    pub skin_width: f32,

    /// Maximum slide iterations per tick during swept resolution.
    pub max_slide_iterations: u32,

    /// Minimum hit normal Y for a surface to count as ground.
    /// 0.7 ≈ 45 degree max slope.
    pub ground_normal_threshold: f32,

    // ========================================================================
    // Movement
    // ========================================================================
    /// Target horizontal speed at full input.
    pub max_move_speed: f32,

    /// Horizontal acceleration while grounded.
    pub ground_accel: f32,

    /// Horizontal acceleration while airborne.
    pub air_accel: f32,

    /// Horizontal acceleration while swinging on a Rope.
    pub rope_accel: f32,

    /// Upward velocity applied by a jump.
    pub jump_speed: f32,

    /// How long a jump request stays valid (seconds).
    pub jump_buffer_duration: f32,

    /// Gravity magnitude (applied downward).
    pub gravity: f32,

    /// Absolute speed cap.
    pub max_speed: f32,

    /// Speed cap multiplier while a line is attached.
    pub grapple_speed_multiplier: f32,

    // ========================================================================
    // Grapple line
    // ========================================================================
    /// Tip travel speed while flying.
    pub line_travel_speed: f32,

    /// Maximum flying length (also the prediction range).
    pub max_line_length: f32,

    /// Attached lines shorter than this are destroyed.
    pub min_attached_length: f32,

    /// Constant pull of an attached Web toward its anchor.
    pub web_force: f32,

    /// Share of tangential velocity a Web keeps when it attaches (0 = none).
    pub web_attach_tangent_retention: f32,

    /// Pull gain applied to Rope stretch beyond the drift tolerance.
    pub rope_correction_gain: f32,

    /// Fraction of Rope stretch removed per tick through velocity.
    pub rope_position_bias: f32,

    /// Tangential acceleration per unit of horizontal input while on a Rope.
    pub rope_swing_gain: f32,

    /// Allowed Rope stretch as a fraction of its length (0.1 = 10%).
    pub rope_drift_tolerance: f32,

    /// A new fire input cancels the current line instead of being ignored.
    pub refire_replaces_line: bool,

    // ========================================================================
    // Session
    // ========================================================================
    /// Ticks between death and respawn.
    pub respawn_delay_ticks: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tick_duration: 1.0 / 60.0,

            collider_size: Vec2::splat(0.8),
            contact_probe_distance: 0.05,
            skin_width: 0.01,
            max_slide_iterations: 3,
            ground_normal_threshold: 0.7,

            max_move_speed: 10.0,
            ground_accel: 60.0,
            air_accel: 30.0,
            rope_accel: 15.0,
            jump_speed: 12.0,
            jump_buffer_duration: 0.1,
            gravity: 30.0,
            max_speed: 25.0,
            grapple_speed_multiplier: 1.2,

            line_travel_speed: 100.0,
            max_line_length: 20.0,
            min_attached_length: 2.0,
            web_force: 300.0,
            web_attach_tangent_retention: 0.0,
            rope_correction_gain: 100.0,
            rope_position_bias: 0.2,
            rope_swing_gain: 20.0,
            rope_drift_tolerance: 0.1,
            refire_replaces_line: true,

            respawn_delay_ticks: 60,
        }
    }
}

impl PhysicsConfig {
    /// Parse a config from JSON. Missing fields take their default.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check every value is in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and greater than zero",
                })
            }
        }

        fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and not negative",
                })
            }
        }

        positive("tick_duration", self.tick_duration)?;
        positive("collider_size.x", self.collider_size.x)?;
        positive("collider_size.y", self.collider_size.y)?;
        positive("contact_probe_distance", self.contact_probe_distance)?;
        non_negative("skin_width", self.skin_width)?;
        positive("max_move_speed", self.max_move_speed)?;
        non_negative("ground_accel", self.ground_accel)?;
        non_negative("air_accel", self.air_accel)?;
        non_negative("rope_accel", self.rope_accel)?;
        non_negative("jump_speed", self.jump_speed)?;
        non_negative("jump_buffer_duration", self.jump_buffer_duration)?;
        non_negative("gravity", self.gravity)?;
        positive("max_speed", self.max_speed)?;
        positive("line_travel_speed", self.line_travel_speed)?;
        positive("max_line_length", self.max_line_length)?;
        non_negative("min_attached_length", self.min_attached_length)?;
        non_negative("web_force", self.web_force)?;
        non_negative("rope_correction_gain", self.rope_correction_gain)?;
        non_negative("rope_swing_gain", self.rope_swing_gain)?;
        non_negative("rope_drift_tolerance", self.rope_drift_tolerance)?;

        if self.max_slide_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "max_slide_iterations",
                reason: "must be at least 1",
            });
        }
        if !(self.grapple_speed_multiplier.is_finite() && self.grapple_speed_multiplier >= 1.0) {
            return Err(ConfigError::Invalid {
                field: "grapple_speed_multiplier",
                reason: "must be at least 1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.ground_normal_threshold) {
            return Err(ConfigError::Invalid {
                field: "ground_normal_threshold",
                reason: "must be within 0.0..=1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.web_attach_tangent_retention) {
            return Err(ConfigError::Invalid {
                field: "web_attach_tangent_retention",
                reason: "must be within 0.0..=1.0",
            });
        }
        if !(0.0..=1.0).contains(&self.rope_position_bias) {
            return Err(ConfigError::Invalid {
                field: "rope_position_bias",
                reason: "must be within 0.0..=1.0",
            });
        }
        if self.min_attached_length >= self.max_line_length {
            return Err(ConfigError::Invalid {
                field: "min_attached_length",
                reason: "must be shorter than max_line_length",
            });
        }

        Ok(())
    }

    /// Speed cap for the current attachment state.
    #[inline]
    pub fn speed_cap(&self, line_attached: bool) -> f32 {
        if line_attached {
            self.max_speed * self.grapple_speed_multiplier
        } else {
            self.max_speed
        }
    }

    /// Half of the collider size.
    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.collider_size * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.gravity > 0.0);
        assert_eq!(config.rope_drift_tolerance, 0.1);
    }

    #[test]
    fn test_speed_cap_widens_while_attached() {
        let config = PhysicsConfig::default();
        assert_eq!(config.speed_cap(false), 25.0);
        assert!((config.speed_cap(true) - 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PhysicsConfig::from_json_str(r#"{ "gravity": 45.0, "jump_speed": 14.0 }"#)
            .unwrap();
        assert_eq!(config.gravity, 45.0);
        assert_eq!(config.jump_speed, 14.0);
        assert_eq!(config.max_move_speed, PhysicsConfig::default().max_move_speed);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = PhysicsConfig::from_json_str(r#"{ "tick_duration": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_duration", .. }));

        let err = PhysicsConfig::from_json_str(r#"{ "grapple_speed_multiplier": 0.5 }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grapple_speed_multiplier", .. }));

        let err = PhysicsConfig::from_json_str(r#"{ "min_attached_length": 50.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_attached_length", .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = PhysicsConfig::from_json_str("{ gravity: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
