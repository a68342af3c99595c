//! The character controller.
//!
//! [`CharacterController`] owns the mode state machine and all state shared
//! between ticks. It never moves the character: the motion engine calls the
//! [`CharacterHooks`] implementation below once per tick and applies the
//! rotation and velocity the controller writes.

use bevy::prelude::*;
use tracing::{debug, trace};

use crate::backend::{CharacterHooks, MotionQuery};
use crate::collision::{HitStabilityReport, MovementHit};
use crate::config::{ControllerConfig, JumpKinematics};
use crate::error::ConfigError;
use crate::intent::InputSnapshot;
use crate::state::{CharacterMode, DashState, JumpState};
use crate::{dash, jumping, locomotion};

/// Kinematic character controller.
///
/// # Example
///
/// ```rust
/// use kinematic_dash_controller::prelude::*;
///
/// let controller = CharacterController::try_new(ControllerConfig::platformer()).unwrap();
/// assert_eq!(controller.mode(), CharacterMode::Default);
/// ```
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct CharacterController {
    pub(crate) config: ControllerConfig,
    /// Derived once from `config` when the controller is built.
    pub(crate) kinematics: JumpKinematics,
    pub(crate) mode: CharacterMode,
    /// World-space move direction from the last default-mode input.
    pub(crate) move_input: Vec3,
    /// Planar camera forward from the last default-mode input.
    pub(crate) look_input: Vec3,
    pub(crate) jump: JumpState,
    pub(crate) dash: DashState,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl CharacterController {
    /// Build a controller, trusting the configuration.
    ///
    /// Starts in [`CharacterMode::Default`].
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            kinematics: config.jump_kinematics(),
            mode: CharacterMode::Default,
            move_input: Vec3::ZERO,
            look_input: Vec3::ZERO,
            jump: JumpState::default(),
            dash: DashState::default(),
        }
    }

    /// Build a controller after validating the configuration.
    pub fn try_new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// The configuration the controller was built with.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Effective gravity, with the vertical component derived from the jump
    /// tunables.
    pub fn gravity(&self) -> Vec3 {
        self.kinematics.gravity
    }

    /// Derived gravity and launch speeds.
    pub fn kinematics(&self) -> &JumpKinematics {
        &self.kinematics
    }

    /// The active mode.
    pub fn mode(&self) -> CharacterMode {
        self.mode
    }

    /// Jump bookkeeping.
    pub fn jump_state(&self) -> &JumpState {
        &self.jump
    }

    /// Dash bookkeeping. Only meaningful while dashing.
    pub fn dash_state(&self) -> &DashState {
        &self.dash
    }

    /// World-space move input.
    pub fn move_input(&self) -> Vec3 {
        self.move_input
    }

    /// Planar look direction.
    pub fn look_input(&self) -> Vec3 {
        self.look_input
    }

    /// Switch to `mode`, running the exit side effects of the current mode and
    /// the enter side effects of the new one.
    ///
    /// Transitioning to the current mode still runs both.
    pub fn transition_to(&mut self, mode: CharacterMode, motor: &dyn MotionQuery) {
        let previous = self.mode;
        self.on_mode_exit(previous, mode);
        self.mode = mode;
        self.on_mode_enter(mode, previous, motor);
        debug!(from = ?previous, to = ?mode, "character mode transition");
    }

    fn on_mode_enter(
        &mut self,
        mode: CharacterMode,
        _from: CharacterMode,
        motor: &dyn MotionQuery,
    ) {
        match mode {
            CharacterMode::Default => {}
            CharacterMode::Dashing => {
                self.dash = DashState::charge(motor.character_forward() * self.config.charge_speed);
            }
        }
    }

    fn on_mode_exit(&mut self, mode: CharacterMode, _to: CharacterMode) {
        match mode {
            CharacterMode::Default | CharacterMode::Dashing => {}
        }
    }

    /// Feed this frame's input.
    ///
    /// A dash press switches to [`CharacterMode::Dashing`] from any mode,
    /// including restarting a dash in progress. Movement and jump input are
    /// only read in [`CharacterMode::Default`].
    pub fn set_inputs(&mut self, inputs: &InputSnapshot, motor: &dyn MotionQuery) {
        if inputs.dash_down {
            self.transition_to(CharacterMode::Dashing, motor);
        }

        match self.mode {
            CharacterMode::Default => {
                let planar = locomotion::planar_input(inputs, motor.character_up());
                self.move_input = planar.move_input;
                self.look_input = planar.look_input;

                if inputs.jump_down {
                    self.jump.request();
                } else if inputs.jump_up {
                    self.jump.release();
                }
            }
            CharacterMode::Dashing => {}
        }
    }
}

impl CharacterHooks for CharacterController {
    fn before_update(&mut self, _motor: &dyn MotionQuery, dt: f32) {
        match self.mode {
            CharacterMode::Default => {}
            CharacterMode::Dashing => dash::advance_timers(&mut self.dash, dt),
        }
    }

    fn update_rotation(&mut self, motor: &dyn MotionQuery, rotation: &mut Quat, dt: f32) {
        match self.mode {
            CharacterMode::Default => {
                if let Some(smoothed) = locomotion::smoothed_rotation(
                    motor,
                    self.look_input,
                    self.config.orientation_sharpness,
                    dt,
                ) {
                    *rotation = smoothed;
                }
            }
            CharacterMode::Dashing => {}
        }
    }

    fn update_velocity(&mut self, motor: &mut dyn MotionQuery, velocity: &mut Vec3, dt: f32) {
        match self.mode {
            CharacterMode::Default => {
                let moved = locomotion::handle_movement(
                    *velocity,
                    self.move_input,
                    &*motor,
                    &self.config,
                    self.kinematics.gravity,
                    dt,
                );
                *velocity = jumping::handle_jump(
                    &mut self.jump,
                    moved,
                    motor,
                    &self.config,
                    &self.kinematics,
                    dt,
                );
            }
            CharacterMode::Dashing => {
                *velocity =
                    dash::update_velocity(&mut self.dash, *velocity, self.kinematics.gravity, dt);
            }
        }
    }

    fn post_grounding_update(&mut self, motor: &dyn MotionQuery, _dt: f32) {
        let current = motor.grounding_status();
        let last = motor.last_grounding_status();
        if current.is_stable_on_ground && !last.is_stable_on_ground {
            trace!(normal = ?current.ground_normal, "character landed");
        } else if !current.is_stable_on_ground && last.is_stable_on_ground {
            trace!("character left ground");
        }
    }

    fn after_update(&mut self, motor: &dyn MotionQuery, dt: f32) {
        match self.mode {
            CharacterMode::Default => {
                jumping::update_after_move(&mut self.jump, motor, &self.config, dt);
            }
            CharacterMode::Dashing => {
                if dash::update_after_move(&mut self.dash, &self.config) {
                    self.transition_to(CharacterMode::Default, motor);
                }
            }
        }
    }

    fn on_movement_hit(
        &mut self,
        motor: &dyn MotionQuery,
        hit: &MovementHit,
        report: &mut HitStabilityReport,
    ) {
        match self.mode {
            CharacterMode::Default => {
                jumping::on_movement_hit(&mut self.jump, motor, &self.config, hit, report);
            }
            CharacterMode::Dashing => dash::on_movement_hit(&mut self.dash, hit, report),
        }
    }
}
