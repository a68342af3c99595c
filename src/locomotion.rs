//! Default-mode locomotion: camera-relative input, turning, ground movement
//! and air control.

use bevy::prelude::*;

use crate::backend::MotionQuery;
use crate::config::ControllerConfig;
use crate::intent::InputSnapshot;
use crate::math::{
    direction_or_zero, look_rotation, project_on_plane, slerp_direction, smoothing_factor,
};

/// Camera-relative movement derived from one input snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarInput {
    /// World-space move direction scaled by stick magnitude (at most 1).
    pub move_input: Vec3,
    /// Camera forward flattened onto the character plane (unit or zero).
    pub look_input: Vec3,
}

/// Flatten the camera onto the plane perpendicular to `up` and express the
/// stick input in that frame.
///
/// When the camera looks straight along `up` its forward projection vanishes,
/// so the camera up axis is projected instead.
pub fn planar_input(input: &InputSnapshot, up: Vec3) -> PlanarInput {
    let camera = input.camera_rotation;

    let mut look = direction_or_zero(project_on_plane(camera * Vec3::NEG_Z, up));
    if look == Vec3::ZERO {
        look = direction_or_zero(project_on_plane(camera * Vec3::Y, up));
    }

    let planar_rotation = look_rotation(look, up);

    PlanarInput {
        move_input: planar_rotation * input.local_move_vector(),
        look_input: look,
    }
}

/// Turn the character toward `look_input`.
///
/// Returns `None` when there is nothing to turn toward or turning is
/// disabled, in which case the engine keeps its rotation.
pub fn smoothed_rotation(
    motor: &dyn MotionQuery,
    look_input: Vec3,
    sharpness: f32,
    dt: f32,
) -> Option<Quat> {
    if look_input == Vec3::ZERO || sharpness <= 0.0 {
        return None;
    }

    let up = motor.character_up();
    let smoothed = slerp_direction(
        motor.character_forward(),
        look_input,
        smoothing_factor(sharpness, dt),
    );
    Some(look_rotation(smoothed, up))
}

/// Velocity after one tick of ground movement or air control.
pub fn handle_movement(
    velocity: Vec3,
    move_input: Vec3,
    motor: &dyn MotionQuery,
    config: &ControllerConfig,
    gravity: Vec3,
    dt: f32,
) -> Vec3 {
    let grounding = motor.grounding_status();
    if grounding.is_stable_on_ground {
        stable_movement(velocity, move_input, motor, config, dt)
    } else {
        air_movement(velocity, move_input, motor, config, gravity, dt)
    }
}

fn stable_movement(
    velocity: Vec3,
    move_input: Vec3,
    motor: &dyn MotionQuery,
    config: &ControllerConfig,
    dt: f32,
) -> Vec3 {
    let ground_normal = motor.grounding_status().ground_normal;

    // Keep speed across slope changes.
    let velocity = motor.project_velocity_onto_surface_tangent(velocity, ground_normal);

    let input_right = move_input.cross(motor.character_up());
    let reoriented_input =
        ground_normal.cross(input_right).normalize_or_zero() * move_input.length();
    let target = reoriented_input * config.max_stable_move_speed;

    velocity.lerp(
        target,
        smoothing_factor(config.stable_movement_sharpness, dt),
    )
}

fn air_movement(
    mut velocity: Vec3,
    move_input: Vec3,
    motor: &dyn MotionQuery,
    config: &ControllerConfig,
    gravity: Vec3,
    dt: f32,
) -> Vec3 {
    if move_input.length_squared() > 0.0 {
        let mut target = move_input * config.max_air_move_speed;

        // Steep ground: don't let air control climb it.
        let grounding = motor.grounding_status();
        if grounding.found_any_ground {
            let up = motor.character_up();
            let obstruction_normal = up
                .cross(grounding.ground_normal)
                .cross(up)
                .normalize_or_zero();
            target = project_on_plane(target, obstruction_normal);
        }

        let velocity_diff = project_on_plane(target - velocity, gravity);
        velocity += velocity_diff * config.air_acceleration_speed * dt;
    }

    velocity += gravity * dt;
    velocity * (1.0 / (1.0 + config.drag * dt))
}
