//! Tuning constants and the run configuration surface.
//!
//! The coordinate system follows the host animation document: Y grows
//! downward, so gravity is +Y and the floor sits at a larger `y` than the
//! bodies above it.

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SimError};

/// Default gravity (scene units per second squared, Y-down).
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, 980.0];

/// Default output frame rate (frames per second).
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Lower clamp for derived body mass.
pub const MIN_MASS: f32 = 0.1;

/// Below this vertical speed a floor contact counts as resting.
pub const GROUNDING_THRESHOLD: f32 = 5.0;

/// Linear speed under which a body accumulates sleep time.
pub const SLEEP_LINEAR_THRESHOLD: f32 = 4.0;

/// Angular speed under which a body accumulates sleep time.
pub const SLEEP_ANGULAR_THRESHOLD: f32 = 0.08;

/// Seconds of stillness before a body falls asleep.
pub const SLEEP_TIMEOUT: f32 = 1.0;

/// Scales the random angular kick applied on floor impacts.
pub const IMPACT_JITTER: f32 = 0.1;

/// Per-frame angular velocity retention while resting on the floor.
pub const GROUNDED_ANGULAR_DAMP: f32 = 0.9;

/// Converts a friction coefficient into a per-frame horizontal decay.
pub const FRICTION_GAIN: f32 = 0.1;

/// Minimum center distance used in the magnetism falloff.
pub const MAGNET_MIN_DISTANCE: f32 = 25.0;

/// Global knobs for one simulation run.
///
/// Deserializes from the host's loosely-typed settings object: unrecognized
/// keys are ignored, the host's camelCase spellings are accepted as aliases,
/// and `gravity` takes either a scalar (vertical strength) or a `[x, y]`
/// pair. Values are range-checked by [`SimSettings::validate`] before a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Gravity acceleration vector, Y-down.
    #[serde(alias = "gravityVector", deserialize_with = "gravity_from_scalar_or_pair")]
    pub gravity: Vec2,
    /// Global bounce factor multiplied into body restitution on floor hits.
    pub bounce: f32,
    /// Y coordinate of the floor line.
    #[serde(alias = "floorY")]
    pub floor_y: f32,
    /// Simulated duration in seconds.
    pub duration: f32,
    /// Samples per second written into each trajectory.
    #[serde(alias = "frameRate")]
    pub frame_rate: f32,
    /// Global per-frame multiplicative velocity retention.
    pub damping: f32,
    /// Default friction for bodies that neither override it nor name a material.
    pub friction: Option<f32>,
    /// Default material preset for bodies that do not name one.
    pub material: String,
    /// Resolve body-body contacts (floor contact is always on).
    #[serde(alias = "enableInterBodyCollision")]
    pub enable_inter_body_collision: bool,
    /// Let resting bodies fall asleep and skip integration.
    #[serde(alias = "enableSleeping")]
    pub enable_sleeping: bool,
    /// Slack distance for AABB overlap and floor contact tests.
    #[serde(alias = "collisionTolerance")]
    pub collision_tolerance: f32,
    /// Multiplies the integration timestep without changing sample times.
    #[serde(alias = "timeScale")]
    pub time_scale: f32,
    /// Global gravity scale multiplied into each body's own.
    #[serde(alias = "gravityScale")]
    pub gravity_scale: f32,
    /// Forces fixed rotation on every seeded body.
    #[serde(alias = "fixedRotation")]
    pub fixed_rotation: bool,
    /// Default collision group for bodies that do not set one.
    #[serde(alias = "collisionGroup")]
    pub collision_group: u32,
    /// Seed for the impact-jitter random stream.
    pub seed: u32,
    /// Time of the first sample in the host timeline.
    #[serde(alias = "startTime")]
    pub start_time: f32,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(DEFAULT_GRAVITY),
            bounce: 0.5,
            floor_y: 1000.0,
            duration: 3.0,
            frame_rate: DEFAULT_FRAME_RATE,
            damping: 0.99,
            friction: None,
            material: "default".to_string(),
            enable_inter_body_collision: true,
            enable_sleeping: true,
            collision_tolerance: 2.0,
            time_scale: 1.0,
            gravity_scale: 1.0,
            fixed_rotation: false,
            collision_group: 1,
            seed: 12345,
            start_time: 0.0,
        }
    }
}

impl SimSettings {
    /// Range-checks every knob, rejecting values the kernel is not prepared
    /// to handle. Called by the session before any state is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SimError::InvalidSetting {
                key: "duration",
                reason: "must be a positive number of seconds",
            });
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(SimError::InvalidSetting {
                key: "frame_rate",
                reason: "must be a positive frames-per-second value",
            });
        }
        if !(0.0..=1.0).contains(&self.bounce) {
            return Err(SimError::InvalidSetting {
                key: "bounce",
                reason: "must lie in [0, 1]",
            });
        }
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(SimError::InvalidSetting {
                key: "damping",
                reason: "must lie in (0, 1]",
            });
        }
        if let Some(friction) = self.friction {
            if !(0.0..=1.0).contains(&friction) {
                return Err(SimError::InvalidSetting {
                    key: "friction",
                    reason: "must lie in [0, 1]",
                });
            }
        }
        if !self.time_scale.is_finite() || self.time_scale <= 0.0 {
            return Err(SimError::InvalidSetting {
                key: "time_scale",
                reason: "must be positive",
            });
        }
        if !self.collision_tolerance.is_finite() || self.collision_tolerance < 0.0 {
            return Err(SimError::InvalidSetting {
                key: "collision_tolerance",
                reason: "must be non-negative",
            });
        }
        if !self.gravity_scale.is_finite() || self.gravity_scale < 0.0 {
            return Err(SimError::InvalidSetting {
                key: "gravity_scale",
                reason: "must be non-negative",
            });
        }
        if !self.gravity.is_finite() || !self.floor_y.is_finite() || !self.start_time.is_finite() {
            return Err(SimError::InvalidSetting {
                key: "gravity/floor_y/start_time",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Fixed timestep used by the integrator.
    pub fn timestep(&self) -> f32 {
        self.time_scale / self.frame_rate
    }

    /// Number of samples written per trajectory.
    pub fn frame_count(&self) -> usize {
        (self.duration * self.frame_rate).floor() as usize
    }
}

fn gravity_from_scalar_or_pair<'de, D>(deserializer: D) -> std::result::Result<Vec2, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Scalar(f32),
        Pair([f32; 2]),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Scalar(strength) => Vec2::new(0.0, strength),
        Raw::Pair([x, y]) => Vec2::new(x, y),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimSettings::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut s = SimSettings::default();
        s.duration = -1.0;
        assert!(matches!(
            s.validate(),
            Err(SimError::InvalidSetting { key: "duration", .. })
        ));

        let mut s = SimSettings::default();
        s.bounce = 1.5;
        assert!(s.validate().is_err());

        let mut s = SimSettings::default();
        s.damping = 0.0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn frame_count_floors() {
        let mut s = SimSettings::default();
        s.duration = 3.05;
        s.frame_rate = 30.0;
        assert_eq!(s.frame_count(), 91);
    }
}
