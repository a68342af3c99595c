//! Dashing mode: a charge pinned to a fixed velocity, ended by a timeout or
//! by running into a wall, followed by a short stop under gravity.

use bevy::prelude::*;
use tracing::debug;

use crate::collision::{HitStabilityReport, MovementHit};
use crate::config::{ControllerConfig, DASH_OBSTRUCTION_DOT};
use crate::state::DashState;

/// Advance the charge and stop timers.
pub fn advance_timers(dash: &mut DashState, dt: f32) {
    dash.time_since_charge_started += dt;
    if dash.stopped {
        dash.time_since_stopped += dt;
    }
}

/// Dash velocity for this tick.
///
/// Charging ignores every external force. Once stopped, velocity is zeroed
/// a single time and then only gravity acts on it.
pub fn update_velocity(dash: &mut DashState, velocity: Vec3, gravity: Vec3, dt: f32) -> Vec3 {
    if dash.must_stop_velocity {
        dash.must_stop_velocity = false;
        Vec3::ZERO
    } else if dash.stopped {
        velocity + gravity * dt
    } else {
        dash.charge_velocity
    }
}

/// Post-move dash bookkeeping.
///
/// Returns `true` once the stop phase is over and the character should go
/// back to default movement.
pub fn update_after_move(dash: &mut DashState, config: &ControllerConfig) -> bool {
    if !dash.stopped && dash.time_since_charge_started > config.max_charge_time {
        dash.stop();
        debug!(
            charged_for = dash.time_since_charge_started,
            "dash stopped: charge time elapsed"
        );
    }

    dash.time_since_stopped > config.stopped_time
}

/// Stop the charge when it runs head-on into an unstable surface.
pub fn on_movement_hit(dash: &mut DashState, hit: &MovementHit, report: &HitStabilityReport) {
    if dash.stopped || report.is_stable {
        return;
    }

    let charge_direction = dash.charge_velocity.normalize_or_zero();
    if (-hit.normal).dot(charge_direction) > DASH_OBSTRUCTION_DOT {
        dash.stop();
        debug!(normal = ?hit.normal, "dash stopped: obstruction");
    }
}
