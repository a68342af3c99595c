//! Motion engine abstraction.
//!
//! The controller never moves the character itself. An external motion engine
//! sweeps the body, resolves collisions and probes the ground, and talks to
//! the controller through two traits:
//!
//! - [`MotionQuery`]: what the controller may ask of (or command to) the engine.
//! - [`CharacterHooks`]: the callbacks the engine invokes on the controller,
//!   once per tick and in a fixed order.
//!
//! [`MotionEngine`] ties both together for the Bevy plugin: it is a component
//! that can run a full tick against a set of hooks.

use bevy::prelude::*;

use crate::collision::{GroundingStatus, HitStabilityReport, MovementHit};

/// Read access to the engine's view of the character, plus the commands the
/// controller may issue.
pub trait MotionQuery {
    /// Character forward direction (unit length).
    fn character_forward(&self) -> Vec3;

    /// Character up direction (unit length).
    fn character_up(&self) -> Vec3;

    /// Grounding status of the current tick.
    fn grounding_status(&self) -> GroundingStatus;

    /// Grounding status of the previous tick.
    fn last_grounding_status(&self) -> GroundingStatus;

    /// Skip ground probing and snapping for `duration` seconds.
    ///
    /// Issued right after a vertical impulse so snapping does not cancel it.
    fn force_unground(&mut self, duration: f32);

    /// Direction tangent to a surface, in the plane spanned by `direction`
    /// and the character up axis.
    fn direction_tangent_to_surface(&self, direction: Vec3, surface_normal: Vec3) -> Vec3 {
        let direction_right = direction.cross(self.character_up());
        surface_normal.cross(direction_right).normalize_or_zero()
    }

    /// Re-tangent `velocity` onto the surface with `surface_normal`, keeping
    /// its magnitude.
    fn project_velocity_onto_surface_tangent(&self, velocity: Vec3, surface_normal: Vec3) -> Vec3 {
        self.direction_tangent_to_surface(velocity, surface_normal) * velocity.length()
    }
}

/// Callbacks the motion engine invokes on the controller.
///
/// Per tick the engine calls, in order: [`before_update`](Self::before_update),
/// [`update_rotation`](Self::update_rotation),
/// [`update_velocity`](Self::update_velocity), any number of
/// [`on_movement_hit`](Self::on_movement_hit) / [`on_ground_hit`](Self::on_ground_hit)
/// during the sweep, [`post_grounding_update`](Self::post_grounding_update),
/// then [`after_update`](Self::after_update).
///
/// The hooks with default bodies are extension points.
pub trait CharacterHooks {
    /// Called before any rotation or velocity is computed.
    fn before_update(&mut self, motor: &dyn MotionQuery, dt: f32);

    /// The only place the character rotation may be written.
    fn update_rotation(&mut self, motor: &dyn MotionQuery, rotation: &mut Quat, dt: f32);

    /// The only place the character velocity may be written.
    fn update_velocity(&mut self, motor: &mut dyn MotionQuery, velocity: &mut Vec3, dt: f32);

    /// Called after the engine has refreshed the grounding status.
    fn post_grounding_update(&mut self, _motor: &dyn MotionQuery, _dt: f32) {}

    /// Called once the tick's movement is complete.
    fn after_update(&mut self, motor: &dyn MotionQuery, dt: f32);

    /// Whether the engine should collide with `collider` at all.
    fn is_collider_valid_for_collisions(&self, _collider: Entity) -> bool {
        true
    }

    /// A contact found by the ground probe.
    fn on_ground_hit(
        &mut self,
        _motor: &dyn MotionQuery,
        _hit: &MovementHit,
        _report: &mut HitStabilityReport,
    ) {
    }

    /// A contact found while sweeping the character along its velocity.
    fn on_movement_hit(
        &mut self,
        motor: &dyn MotionQuery,
        hit: &MovementHit,
        report: &mut HitStabilityReport,
    );

    /// Lets the controller adjust the engine's stability verdict.
    fn process_hit_stability_report(
        &mut self,
        _motor: &dyn MotionQuery,
        _hit: &MovementHit,
        _at_position: Vec3,
        _at_rotation: Quat,
        _report: &mut HitStabilityReport,
    ) {
    }

    /// An overlap found by the engine's discrete collision pass.
    fn on_discrete_collision_detected(&mut self, _collider: Entity) {}

    /// External velocity contribution, such as a launch pad.
    fn add_velocity(&mut self, _velocity: Vec3) {}
}

/// A motion engine that can run one full tick against a set of hooks.
///
/// Implemented by the engine's per-character component so the plugin can
/// drive it from a system.
pub trait MotionEngine: MotionQuery + Send + Sync + 'static {
    /// Run one tick of `dt` seconds, invoking `hooks` in the documented order.
    fn simulate(&mut self, hooks: &mut dyn CharacterHooks, dt: f32);
}
