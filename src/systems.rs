//! Core controller systems.
//!
//! Each system is generic over the motion engine component `M` that moves the
//! character. They run chained in `FixedUpdate`: input is handed to the
//! controller, the engine simulates one tick calling back into the controller,
//! and marker components are synced from the result.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use crate::backend::{MotionEngine, MotionQuery};
use crate::controller::CharacterController;
use crate::intent::CharacterInput;
use crate::state::{Airborne, CharacterMode, Dashing, Grounded};

/// Fallback tick length when no fixed clock is present.
const FALLBACK_DT: f32 = 1.0 / 60.0;

/// Length of one fixed tick in seconds.
fn fixed_dt(time: Option<&Time<Fixed>>) -> f32 {
    time.map(|t| t.timestep().as_secs_f32())
        .filter(|&dt| dt > 0.0)
        .unwrap_or(FALLBACK_DT)
}

/// Hand each pending input snapshot to its controller.
///
/// Snapshots are consumed, so an entity without fresh input this tick keeps
/// whatever the controller last derived.
pub fn apply_character_input<M: MotionEngine + Component<Mutability = Mutable>>(
    mut q_controllers: Query<(&mut CharacterController, &mut CharacterInput, &M)>,
) {
    for (mut controller, mut input, motor) in &mut q_controllers {
        if let Some(snapshot) = input.take() {
            controller.set_inputs(&snapshot, motor);
        }
    }
}

/// Run one motion engine tick per character.
pub fn run_character_motors<M: MotionEngine + Component<Mutability = Mutable>>(
    time: Option<Res<Time<Fixed>>>,
    mut q_controllers: Query<(&mut CharacterController, &mut M)>,
) {
    let dt = fixed_dt(time.as_deref());

    for (mut controller, mut motor) in &mut q_controllers {
        motor.simulate(&mut *controller, dt);
    }
}

/// Sync state marker components from the controller mode and engine
/// grounding.
pub fn sync_state_markers<M: MotionEngine + Component<Mutability = Mutable>>(
    mut commands: Commands,
    q_controllers: Query<(
        Entity,
        &CharacterController,
        &M,
        Has<Grounded>,
        Has<Airborne>,
        Has<Dashing>,
    )>,
) {
    for (entity, controller, motor, has_grounded, has_airborne, has_dashing) in &q_controllers {
        let grounded = motor.grounding_status().is_stable_on_ground;

        if grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !grounded && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }

        let dashing = controller.mode() == CharacterMode::Dashing;
        if dashing && !has_dashing {
            commands.entity(entity).insert(Dashing);
        } else if !dashing && has_dashing {
            commands.entity(entity).remove::<Dashing>();
        }
    }
}
