//! Controller state: the active mode, the jump bookkeeping shared by all
//! modes, the dash bookkeeping, and the marker components the plugin keeps in
//! sync for other systems to query.

use bevy::prelude::*;

/// Movement mode of a character. Exactly one is active at a time.
///
/// Changed only through
/// [`CharacterController::transition_to`](crate::controller::CharacterController::transition_to).
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CharacterMode {
    /// Walking, air control and jumping.
    #[default]
    Default,
    /// Timed charge along a fixed velocity, followed by a short stop.
    Dashing,
}

/// Jump bookkeeping. Lives for the whole lifetime of the character and
/// persists across mode changes.
///
/// `jumped_this_frame` and `can_wall_jump` are frame-scoped: the first is
/// reset at the start of every velocity update, the second cleared at its end.
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct JumpState {
    /// A jump was pressed and has not been executed or expired yet.
    pub requested: bool,
    /// Seconds since the last jump press. Drives the pre-grounding grace.
    pub time_since_requested: f32,
    /// The primary (ground, coyote or wall) jump was used.
    pub consumed: bool,
    /// The air jump was used.
    pub double_jump_consumed: bool,
    /// A jump impulse was applied during this tick's velocity update.
    pub jumped_this_frame: bool,
    /// Jump was released; clamp the ascent on the next velocity update.
    pub released: bool,
    /// Seconds since the character last stood on jumpable ground.
    pub time_since_last_able_to_jump: f32,
    /// A wall hit this tick allows a wall jump.
    pub can_wall_jump: bool,
    /// Normal of the wall that armed `can_wall_jump`.
    pub wall_jump_normal: Vec3,
}

impl Default for JumpState {
    fn default() -> Self {
        Self {
            requested: false,
            time_since_requested: f32::INFINITY,
            consumed: false,
            double_jump_consumed: false,
            jumped_this_frame: false,
            released: false,
            time_since_last_able_to_jump: 0.0,
            can_wall_jump: false,
            wall_jump_normal: Vec3::ZERO,
        }
    }
}

impl JumpState {
    /// Arm a jump request and restart its grace timer.
    pub fn request(&mut self) {
        self.requested = true;
        self.time_since_requested = 0.0;
    }

    /// Record that jump was released.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Allow a wall jump off `normal` during the next velocity update.
    pub fn arm_wall_jump(&mut self, normal: Vec3) {
        self.can_wall_jump = true;
        self.wall_jump_normal = normal;
    }

    /// Restore both jumps after landing.
    pub fn refill(&mut self) {
        self.consumed = false;
        self.double_jump_consumed = false;
    }
}

/// Dash bookkeeping. Meaningful only while the mode is
/// [`CharacterMode::Dashing`]; fully reset on every entry.
#[derive(Reflect, Debug, Clone, Default, PartialEq)]
pub struct DashState {
    /// Velocity the charge is pinned to.
    pub charge_velocity: Vec3,
    /// The charge has ended; only gravity applies now.
    pub stopped: bool,
    /// Zero the velocity on the next velocity update.
    pub must_stop_velocity: bool,
    /// Seconds since the charge started.
    pub time_since_charge_started: f32,
    /// Seconds since the charge was stopped.
    pub time_since_stopped: f32,
}

impl DashState {
    /// Fresh state for a charge along `charge_velocity`.
    pub fn charge(charge_velocity: Vec3) -> Self {
        Self {
            charge_velocity,
            ..default()
        }
    }

    /// End the charge. Velocity is zeroed on the next velocity update.
    pub fn stop(&mut self) {
        self.must_stop_velocity = true;
        self.stopped = true;
    }
}

/// Marker component: the character stands on stable ground.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component: the character is not on stable ground.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component: the character is in [`CharacterMode::Dashing`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Dashing;
