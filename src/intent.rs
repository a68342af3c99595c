//! Per-frame player input.
//!
//! The input stage (device polling, camera orbit) is not part of this crate.
//! It reduces everything to an [`InputSnapshot`] once per frame and hands it
//! to the controller, either directly through
//! [`CharacterController::set_inputs`](crate::controller::CharacterController::set_inputs)
//! or through the [`CharacterInput`] component when the plugin is used.

use bevy::prelude::*;

/// Immutable input for one frame.
///
/// Button fields are edges: `jump_down` is true only on the frame jump was
/// pressed, `jump_up` only on the frame it was released.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use kinematic_dash_controller::prelude::*;
///
/// let input = InputSnapshot::new()
///     .with_move_axes(1.0, 0.0)
///     .with_camera_rotation(Quat::IDENTITY)
///     .with_jump_down();
/// assert!(input.jump_down);
/// ```
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Forward axis (-1.0 = back, 1.0 = forward).
    pub move_axis_forward: f32,
    /// Right axis (-1.0 = left, 1.0 = right).
    pub move_axis_right: f32,
    /// Orientation of the camera the input is relative to.
    pub camera_rotation: Quat,
    /// Jump was pressed this frame.
    pub jump_down: bool,
    /// Jump was released this frame.
    pub jump_up: bool,
    /// Dash was pressed this frame.
    pub dash_down: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            move_axis_forward: 0.0,
            move_axis_right: 0.0,
            camera_rotation: Quat::IDENTITY,
            jump_down: false,
            jump_up: false,
            dash_down: false,
        }
    }
}

impl InputSnapshot {
    /// An idle snapshot: no movement, camera at identity, no buttons.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set both move axes, each clamped to `[-1, 1]`.
    pub fn with_move_axes(mut self, forward: f32, right: f32) -> Self {
        self.move_axis_forward = forward.clamp(-1.0, 1.0);
        self.move_axis_right = right.clamp(-1.0, 1.0);
        self
    }

    /// Builder: set the camera orientation.
    pub fn with_camera_rotation(mut self, rotation: Quat) -> Self {
        self.camera_rotation = rotation.normalize();
        self
    }

    /// Builder: jump pressed this frame.
    pub fn with_jump_down(mut self) -> Self {
        self.jump_down = true;
        self
    }

    /// Builder: jump released this frame.
    pub fn with_jump_up(mut self) -> Self {
        self.jump_up = true;
        self
    }

    /// Builder: dash pressed this frame.
    pub fn with_dash_down(mut self) -> Self {
        self.dash_down = true;
        self
    }

    /// Move axes as a camera-local vector, clamped to unit length.
    ///
    /// Forward maps to `-Z` and right to `+X`.
    pub fn local_move_vector(&self) -> Vec3 {
        Vec3::new(self.move_axis_right, 0.0, -self.move_axis_forward).clamp_length_max(1.0)
    }

    /// Fold a later snapshot into this one.
    ///
    /// Axes and camera take the later values. Button edges accumulate so a
    /// press is never lost between two ticks.
    pub fn merge(&mut self, later: InputSnapshot) {
        self.move_axis_forward = later.move_axis_forward;
        self.move_axis_right = later.move_axis_right;
        self.camera_rotation = later.camera_rotation;
        self.jump_down |= later.jump_down;
        self.jump_up |= later.jump_up;
        self.dash_down |= later.dash_down;
    }
}

/// Holds the snapshot produced by the input stage until the controller
/// consumes it.
///
/// The input stage calls [`submit`](Self::submit) each frame. Frames that
/// arrive before the next tick are merged, so button edges are kept. The
/// plugin's input system takes the snapshot and applies it exactly once, so
/// edges never fire twice.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct CharacterInput {
    pending: Option<InputSnapshot>,
}

impl CharacterInput {
    /// Create an empty input holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the snapshot for the next tick, merging it into any unconsumed
    /// one.
    pub fn submit(&mut self, snapshot: InputSnapshot) {
        match &mut self.pending {
            Some(pending) => pending.merge(snapshot),
            None => self.pending = Some(snapshot),
        }
    }

    /// Take and consume the pending snapshot, if any.
    pub fn take(&mut self) -> Option<InputSnapshot> {
        self.pending.take()
    }

    /// Check if a snapshot is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
