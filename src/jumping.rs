//! Jumping: buffered requests, coyote time, double jump, wall jump and
//! variable jump height.
//!
//! The jump step runs after movement in the velocity update, so the impulse
//! it writes is never smoothed away in the same tick.

use bevy::prelude::*;
use tracing::{debug, trace};

use crate::backend::MotionQuery;
use crate::collision::{HitStabilityReport, MovementHit};
use crate::config::{ControllerConfig, JumpKinematics, JUMP_UNGROUND_TIME};
use crate::math::project_on_axis;
use crate::state::JumpState;

/// Which jump fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// From the ground, or within the post-grounding grace window.
    Ground,
    /// Off steep ground, along its normal.
    Slide,
    /// Off a wall touched this tick.
    Wall,
    /// The extra jump while airborne.
    Double,
}

/// Apply any pending jump to `velocity`.
///
/// Order matters and is kept as follows: the double jump is tried first,
/// then the primary jump (ground, grace window or wall) is tried regardless,
/// then an early release clamps the ascent. Wall-jump eligibility is always
/// dropped at the end.
pub fn handle_jump(
    jump: &mut JumpState,
    mut velocity: Vec3,
    motor: &mut dyn MotionQuery,
    config: &ControllerConfig,
    kinematics: &JumpKinematics,
    dt: f32,
) -> Vec3 {
    jump.jumped_this_frame = false;
    jump.time_since_requested += dt;

    if jump.requested {
        let grounding = motor.grounding_status();
        let up = motor.character_up();
        let can_jump_from_ground = grounding.can_jump_from(config.allow_jumping_when_sliding);

        if config.allow_double_jump
            && jump.consumed
            && !jump.double_jump_consumed
            && !can_jump_from_ground
        {
            motor.force_unground(JUMP_UNGROUND_TIME);
            velocity += up * kinematics.jump_velocity - project_on_axis(velocity, up);

            jump.double_jump_consumed = true;
            jump.jumped_this_frame = true;
            jump.requested = false;
            debug!(kind = ?JumpKind::Double, "character jumped");
        }

        let within_grace =
            jump.time_since_last_able_to_jump <= config.jump_post_grounding_grace_time;
        if jump.can_wall_jump || (!jump.consumed && (can_jump_from_ground || within_grace)) {
            let (kind, direction) = if jump.can_wall_jump {
                (JumpKind::Wall, jump.wall_jump_normal)
            } else if grounding.is_sliding() {
                (JumpKind::Slide, grounding.ground_normal)
            } else {
                (JumpKind::Ground, up)
            };

            motor.force_unground(JUMP_UNGROUND_TIME);
            velocity += direction * kinematics.jump_velocity - project_on_axis(velocity, up);

            jump.consumed = true;
            jump.requested = false;
            jump.jumped_this_frame = true;
            debug!(?kind, ?direction, "character jumped");
        }
    }

    if jump.released {
        let up = motor.character_up();
        let vertical_speed = velocity.dot(up);
        if vertical_speed > kinematics.min_jump_velocity {
            velocity += up * (kinematics.min_jump_velocity - vertical_speed);
        }
        jump.released = false;
    }

    jump.can_wall_jump = false;
    velocity
}

/// Post-move jump bookkeeping: expire stale requests, and refill jumps or
/// run the coyote timer depending on ground contact.
pub fn update_after_move(
    jump: &mut JumpState,
    motor: &dyn MotionQuery,
    config: &ControllerConfig,
    dt: f32,
) {
    if jump.requested && jump.time_since_requested > config.jump_pre_grounding_grace_time {
        jump.requested = false;
        trace!(
            waited = jump.time_since_requested,
            "jump request expired before landing"
        );
    }

    if motor
        .grounding_status()
        .can_jump_from(config.allow_jumping_when_sliding)
    {
        if !jump.jumped_this_frame {
            jump.refill();
        }
        jump.time_since_last_able_to_jump = 0.0;
    } else {
        jump.time_since_last_able_to_jump += dt;
    }
}

/// Arm a wall jump when an airborne character runs into an unstable surface.
pub fn on_movement_hit(
    jump: &mut JumpState,
    motor: &dyn MotionQuery,
    config: &ControllerConfig,
    hit: &MovementHit,
    report: &HitStabilityReport,
) {
    if config.allow_wall_jump
        && !motor.grounding_status().is_stable_on_ground
        && !report.is_stable
    {
        jump.arm_wall_jump(hit.normal);
    }
}
