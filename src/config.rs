//! Controller configuration.
//!
//! All tunables are plain numbers and flags. Jump gravity and launch speeds
//! are not configured directly: they are derived from the desired jump
//! heights and the time to reach the apex, see [`JumpKinematics`].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Duration ground snapping is suppressed after any jump impulse (seconds).
pub const JUMP_UNGROUND_TIME: f32 = 0.1;

/// Minimum alignment between an obstruction and the charge direction for the
/// obstruction to stop a dash.
pub const DASH_OBSTRUCTION_DOT: f32 = 0.5;

/// Configuration parameters for the character controller.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct ControllerConfig {
    // === Stable Movement ===
    /// Top speed on walkable ground (units/second).
    pub max_stable_move_speed: f32,

    /// How quickly ground velocity converges on the target velocity.
    pub stable_movement_sharpness: f32,

    /// How quickly the character turns toward the camera direction.
    /// Zero disables turning.
    pub orientation_sharpness: f32,

    // === Air Movement ===
    /// Top speed reachable through air control (units/second).
    pub max_air_move_speed: f32,

    /// Air control acceleration factor.
    pub air_acceleration_speed: f32,

    /// Air drag coefficient.
    pub drag: f32,

    // === Jumping ===
    /// Sliding on steep ground counts as grounded for jumping.
    pub allow_jumping_when_sliding: bool,

    /// One extra jump while airborne.
    pub allow_double_jump: bool,

    /// Jumping off walls touched while airborne.
    pub allow_wall_jump: bool,

    /// Apex height of a full jump (units).
    pub max_jump_height: f32,

    /// Apex height of a jump released immediately (units).
    pub min_jump_height: f32,

    /// Seconds from launch to apex for a full jump.
    pub time_to_jump_apex: f32,

    /// How long a jump press stays buffered before landing (seconds).
    pub jump_pre_grounding_grace_time: f32,

    /// How long after leaving ground a jump is still allowed (seconds).
    pub jump_post_grounding_grace_time: f32,

    // === Dashing ===
    /// Charge speed along the character forward (units/second).
    pub charge_speed: f32,

    /// Maximum charge duration before the dash stops on its own (seconds).
    pub max_charge_time: f32,

    /// Time spent stopped before returning to default movement (seconds).
    pub stopped_time: f32,

    // === Misc ===
    /// Gravity vector. The `y` component is replaced by the value derived
    /// from the jump parameters when the controller is built.
    pub gravity: Vec3,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Stable movement
            max_stable_move_speed: 10.0,
            stable_movement_sharpness: 15.0,
            orientation_sharpness: 10.0,

            // Air movement
            max_air_move_speed: 10.0,
            air_acceleration_speed: 5.0,
            drag: 0.1,

            // Jumping
            allow_jumping_when_sliding: false,
            allow_double_jump: false,
            allow_wall_jump: false,
            max_jump_height: 4.0,
            min_jump_height: 1.0,
            time_to_jump_apex: 0.4,
            jump_pre_grounding_grace_time: 0.0,
            jump_post_grounding_grace_time: 0.0,

            // Dashing
            charge_speed: 15.0,
            max_charge_time: 1.5,
            stopped_time: 1.0,

            gravity: Vec3::new(0.0, -30.0, 0.0),
        }
    }
}

impl ControllerConfig {
    /// Plain defaults, tuned for a player character.
    pub fn player() -> Self {
        Self::default()
    }

    /// Forgiving platformer preset: double jump, wall jump, sliding jumps and
    /// short grace windows on both sides of landing.
    pub fn platformer() -> Self {
        Self {
            allow_jumping_when_sliding: true,
            allow_double_jump: true,
            allow_wall_jump: true,
            jump_pre_grounding_grace_time: 0.1,
            jump_post_grounding_grace_time: 0.1,
            ..default()
        }
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every tunable is finite and positive where that matters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let strictly_positive = [
            ("max_jump_height", self.max_jump_height),
            ("time_to_jump_apex", self.time_to_jump_apex),
        ];
        let non_negative = [
            ("max_stable_move_speed", self.max_stable_move_speed),
            ("stable_movement_sharpness", self.stable_movement_sharpness),
            ("orientation_sharpness", self.orientation_sharpness),
            ("max_air_move_speed", self.max_air_move_speed),
            ("air_acceleration_speed", self.air_acceleration_speed),
            ("drag", self.drag),
            ("min_jump_height", self.min_jump_height),
            ("jump_pre_grounding_grace_time", self.jump_pre_grounding_grace_time),
            ("jump_post_grounding_grace_time", self.jump_post_grounding_grace_time),
            ("charge_speed", self.charge_speed),
            ("max_charge_time", self.max_charge_time),
            ("stopped_time", self.stopped_time),
        ];

        for &(field, value) in strictly_positive.iter().chain(non_negative.iter()) {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        if !self.gravity.is_finite() {
            return Err(ConfigError::NotFinite { field: "gravity" });
        }

        for (field, value) in strictly_positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }

    /// Gravity and launch speeds implied by the jump tunables.
    pub fn jump_kinematics(&self) -> JumpKinematics {
        JumpKinematics::derive(
            self.gravity,
            self.max_jump_height,
            self.min_jump_height,
            self.time_to_jump_apex,
        )
    }

    /// Builder: set stable ground movement.
    pub fn with_stable_movement(mut self, max_speed: f32, sharpness: f32) -> Self {
        self.max_stable_move_speed = max_speed;
        self.stable_movement_sharpness = sharpness;
        self
    }

    /// Builder: set orientation sharpness.
    pub fn with_orientation_sharpness(mut self, sharpness: f32) -> Self {
        self.orientation_sharpness = sharpness;
        self
    }

    /// Builder: set air control.
    pub fn with_air_movement(mut self, max_speed: f32, acceleration: f32, drag: f32) -> Self {
        self.max_air_move_speed = max_speed;
        self.air_acceleration_speed = acceleration;
        self.drag = drag;
        self
    }

    /// Builder: set jump heights and the time to reach the apex.
    pub fn with_jump_heights(
        mut self,
        min_height: f32,
        max_height: f32,
        time_to_apex: f32,
    ) -> Self {
        self.min_jump_height = min_height;
        self.max_jump_height = max_height;
        self.time_to_jump_apex = time_to_apex;
        self
    }

    /// Builder: set pre- and post-grounding grace times.
    pub fn with_grace_times(mut self, pre_grounding: f32, post_grounding: f32) -> Self {
        self.jump_pre_grounding_grace_time = pre_grounding;
        self.jump_post_grounding_grace_time = post_grounding;
        self
    }

    /// Builder: enable or disable the double jump.
    pub fn with_double_jump(mut self, enabled: bool) -> Self {
        self.allow_double_jump = enabled;
        self
    }

    /// Builder: enable or disable wall jumps.
    pub fn with_wall_jump(mut self, enabled: bool) -> Self {
        self.allow_wall_jump = enabled;
        self
    }

    /// Builder: enable or disable jumping while sliding.
    pub fn with_jumping_when_sliding(mut self, enabled: bool) -> Self {
        self.allow_jumping_when_sliding = enabled;
        self
    }

    /// Builder: set dash parameters.
    pub fn with_dash(mut self, charge_speed: f32, max_charge_time: f32, stopped_time: f32) -> Self {
        self.charge_speed = charge_speed;
        self.max_charge_time = max_charge_time;
        self.stopped_time = stopped_time;
        self
    }

    /// Builder: set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }
}

/// Gravity and launch speeds derived from the jump tunables.
///
/// With `g = 2·H / T²` a launch at `g·T` peaks at exactly `H` after `T`
/// seconds. Releasing jump early clamps the ascent to the speed that peaks at
/// the minimum height, `sqrt(2·g·h)`.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct JumpKinematics {
    /// Gravity with the derived vertical component.
    pub gravity: Vec3,
    /// Launch speed of a full jump.
    pub jump_velocity: f32,
    /// Upward speed a released jump is clamped to.
    pub min_jump_velocity: f32,
}

impl JumpKinematics {
    /// Derive from the configured gravity, jump heights and apex time.
    pub fn derive(gravity: Vec3, max_height: f32, min_height: f32, time_to_apex: f32) -> Self {
        let gravity_y = -(2.0 * max_height) / time_to_apex.powi(2);
        let jump_velocity = gravity_y.abs() * time_to_apex;
        let min_jump_velocity = (2.0 * gravity_y.abs() * min_height).sqrt();

        Self {
            gravity: Vec3::new(gravity.x, gravity_y, gravity.z),
            jump_velocity,
            min_jump_velocity,
        }
    }
}
