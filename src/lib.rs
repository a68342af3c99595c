//! # `kinematic_dash_controller`
//!
//! A kinematic character controller with a mode state machine and a motion
//! engine abstraction.
//!
//! This crate provides the decision layer of a character controller:
//! - Camera-relative ground movement and air control
//! - Buffered jumps, coyote time, double jump, wall jump and variable height
//! - A timed dash that stops on frontal obstructions
//! - Frame-rate independent smoothing of velocity and facing
//!
//! ## Architecture
//!
//! The controller never moves the character itself. A motion engine
//! ([`backend::MotionEngine`]) owns sweeps, depenetration and grounding, and
//! calls back into the controller ([`backend::CharacterHooks`]) once per tick:
//! 1. `before_update` advances mode timers
//! 2. `update_rotation` and `update_velocity` write the desired motion
//! 3. hit callbacks arm wall jumps or stop dashes
//! 4. `after_update` expires jump requests and ends dashes
//!
//! ## Usage
//!
//! ```rust
//! use kinematic_dash_controller::prelude::*;
//!
//! let config = ControllerConfig::platformer();
//! let controller = CharacterController::try_new(config).unwrap();
//! assert_eq!(controller.mode(), CharacterMode::Default);
//!
//! // Spawn it with a `CharacterInput` next to your motion engine component.
//! ```

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod controller;
pub mod dash;
pub mod error;
pub mod intent;
pub mod jumping;
pub mod locomotion;
pub mod math;
pub mod state;
pub mod systems;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{CharacterHooks, MotionEngine, MotionQuery};
    pub use crate::collision::{GroundingStatus, HitStabilityReport, MovementHit};
    pub use crate::config::{ControllerConfig, JumpKinematics};
    pub use crate::controller::CharacterController;
    pub use crate::error::ConfigError;
    pub use crate::intent::{CharacterInput, InputSnapshot};
    pub use crate::state::{Airborne, CharacterMode, DashState, Dashing, Grounded, JumpState};
    pub use crate::KinematicControllerPlugin;
}

/// Main plugin for the character controller system.
///
/// Generic over the motion engine component `M` that moves each character.
/// Entities need a [`controller::CharacterController`], an
/// [`intent::CharacterInput`] and an `M`.
///
/// # Examples
///
/// ```rust,ignore
/// use bevy::prelude::*;
/// use kinematic_dash_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(KinematicControllerPlugin::<MyMotor>::default())
///     .run();
/// ```
pub struct KinematicControllerPlugin<M> {
    _marker: std::marker::PhantomData<M>,
}

impl<M> Default for KinematicControllerPlugin<M> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<M> Plugin for KinematicControllerPlugin<M>
where
    M: backend::MotionEngine + Component<Mutability = Mutable>,
{
    fn build(&self, app: &mut App) {
        app.register_type::<controller::CharacterController>();
        app.register_type::<config::ControllerConfig>();
        app.register_type::<config::JumpKinematics>();
        app.register_type::<intent::CharacterInput>();
        app.register_type::<intent::InputSnapshot>();
        app.register_type::<state::CharacterMode>();
        app.register_type::<state::JumpState>();
        app.register_type::<state::DashState>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::Dashing>();
        app.register_type::<collision::GroundingStatus>();

        app.add_systems(
            FixedUpdate,
            (
                systems::apply_character_input::<M>,
                systems::run_character_motors::<M>,
                systems::sync_state_markers::<M>,
            )
                .chain(),
        );
    }
}
