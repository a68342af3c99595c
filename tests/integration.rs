//! Integration tests for the character controller.
//!
//! A scripted motion engine stands in for a real one: it integrates velocity
//! over a flat floor at `y = 0`, honors `force_unground`, and replays injected
//! movement hits. Each test drives whole ticks through `MotionEngine::simulate`
//! and checks the resulting motion.

use bevy::prelude::*;
use kinematic_dash_controller::prelude::*;

const DT: f32 = 1.0 / 60.0;

/// Minimal motion engine over an infinite flat floor.
#[derive(Component, Debug, Clone)]
struct ScriptedMotor {
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    has_floor: bool,
    grounding: GroundingStatus,
    last_grounding: GroundingStatus,
    unground_timer: f32,
    unground_calls: Vec<f32>,
    pending_hits: Vec<(MovementHit, HitStabilityReport)>,
}

impl ScriptedMotor {
    fn on_floor() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            has_floor: true,
            grounding: GroundingStatus::stable(Vec3::Y),
            last_grounding: GroundingStatus::stable(Vec3::Y),
            unground_timer: 0.0,
            unground_calls: Vec::new(),
            pending_hits: Vec::new(),
        }
    }

    fn falling_from(height: f32) -> Self {
        Self {
            position: Vec3::new(0.0, height, 0.0),
            grounding: GroundingStatus::airborne(),
            last_grounding: GroundingStatus::airborne(),
            ..Self::on_floor()
        }
    }

    /// Report an unstable wall contact during the next sweep.
    fn inject_wall_hit(&mut self, normal: Vec3) {
        self.pending_hits.push((
            MovementHit::new(normal, self.position, None),
            HitStabilityReport::unstable(),
        ));
    }

    fn update_grounding(&mut self, dt: f32) {
        self.last_grounding = self.grounding;
        self.unground_timer = (self.unground_timer - dt).max(0.0);

        let touching_floor = self.has_floor && self.position.y <= 0.0 && self.velocity.y <= 0.0;
        if touching_floor && self.unground_timer <= 0.0 {
            self.position.y = 0.0;
            self.velocity.y = 0.0;
            self.grounding = GroundingStatus::stable(Vec3::Y);
        } else {
            self.grounding = GroundingStatus::airborne();
        }
    }
}

impl MotionQuery for ScriptedMotor {
    fn character_forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    fn character_up(&self) -> Vec3 {
        Vec3::Y
    }

    fn grounding_status(&self) -> GroundingStatus {
        self.grounding
    }

    fn last_grounding_status(&self) -> GroundingStatus {
        self.last_grounding
    }

    fn force_unground(&mut self, duration: f32) {
        self.unground_calls.push(duration);
        self.unground_timer = duration;
    }
}

impl MotionEngine for ScriptedMotor {
    fn simulate(&mut self, hooks: &mut dyn CharacterHooks, dt: f32) {
        hooks.before_update(&*self, dt);

        let mut rotation = self.rotation;
        hooks.update_rotation(&*self, &mut rotation, dt);
        self.rotation = rotation;

        let mut velocity = self.velocity;
        hooks.update_velocity(&mut *self, &mut velocity, dt);
        self.velocity = velocity;
        self.position += self.velocity * dt;

        for (hit, mut report) in std::mem::take(&mut self.pending_hits) {
            hooks.on_movement_hit(&*self, &hit, &mut report);
        }

        self.update_grounding(dt);
        hooks.post_grounding_update(&*self, dt);
        hooks.after_update(&*self, dt);
    }
}

/// One full tick, optionally feeding input first.
fn step(
    controller: &mut CharacterController,
    motor: &mut ScriptedMotor,
    input: Option<InputSnapshot>,
) {
    if let Some(input) = input {
        controller.set_inputs(&input, &*motor);
    }
    motor.simulate(controller, DT);
}

fn no_drag(config: ControllerConfig) -> ControllerConfig {
    config.with_air_movement(10.0, 5.0, 0.0)
}

/// Tick index (1-based) on which a character dropped from `height` lands.
fn landing_tick(config: ControllerConfig, height: f32) -> usize {
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::falling_from(height);
    for tick in 1..=600 {
        step(&mut controller, &mut motor, None);
        if motor.grounding.is_stable_on_ground {
            return tick;
        }
    }
    panic!("character never landed");
}

// ==================== Jumping ====================

#[test]
fn full_jump_reaches_configured_height_at_configured_time() {
    let mut controller = CharacterController::new(no_drag(ControllerConfig::default()));
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!((motor.velocity.y - 20.0).abs() < 0.001);
    assert_eq!(motor.unground_calls, vec![0.1]);

    let mut apex = motor.position.y;
    let mut apex_tick = 1;
    for tick in 2..=120 {
        step(&mut controller, &mut motor, None);
        if motor.position.y > apex {
            apex = motor.position.y;
            apex_tick = tick;
        }
    }

    // Discrete integration overshoots the analytic 4.0 slightly.
    assert!((apex - 4.0).abs() < 0.25, "apex was {apex}");
    let apex_time = apex_tick as f32 * DT;
    assert!((apex_time - 0.4).abs() < 2.0 * DT, "apex time was {apex_time}");

    // Back on the floor with the jump refilled.
    assert!(motor.grounding.is_stable_on_ground);
    assert!(!controller.jump_state().consumed);
}

#[test]
fn early_release_cuts_jump_short() {
    let mut controller = CharacterController::new(no_drag(ControllerConfig::default()));
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    step(&mut controller, &mut motor, None);
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_up()));

    assert!((motor.velocity.y - controller.kinematics().min_jump_velocity).abs() < 0.001);

    let mut apex = motor.position.y;
    for _ in 0..60 {
        step(&mut controller, &mut motor, None);
        apex = apex.max(motor.position.y);
    }

    assert!(apex > 1.0, "apex was {apex}");
    assert!(apex < 2.0, "apex was {apex}");
}

#[test]
fn release_while_falling_does_nothing() {
    let mut controller = CharacterController::new(no_drag(ControllerConfig::default()));
    let mut motor = ScriptedMotor::falling_from(10.0);

    step(&mut controller, &mut motor, None);
    let before = motor.velocity.y;
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_up()));

    assert!(motor.velocity.y < before);
    assert!(!controller.jump_state().released);
}

#[test]
fn double_jump_fires_once_per_airtime() {
    let config = no_drag(ControllerConfig::platformer());
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    for _ in 0..15 {
        step(&mut controller, &mut motor, None);
    }
    assert!(motor.velocity.y < 10.0);

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!((motor.velocity.y - 20.0).abs() < 0.001);
    assert!(controller.jump_state().double_jump_consumed);

    for _ in 0..5 {
        step(&mut controller, &mut motor, None);
    }
    let before = motor.velocity.y;
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!(motor.velocity.y < before, "third jump must be rejected");
    assert_eq!(motor.unground_calls.len(), 2);
}

#[test]
fn double_jump_refills_on_landing() {
    let config = no_drag(ControllerConfig::platformer());
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!(controller.jump_state().double_jump_consumed);

    for _ in 0..240 {
        step(&mut controller, &mut motor, None);
    }

    assert!(motor.grounding.is_stable_on_ground);
    assert!(!controller.jump_state().consumed);
    assert!(!controller.jump_state().double_jump_consumed);
}

#[test]
fn coyote_time_allows_late_jump() {
    let config = no_drag(ControllerConfig::default().with_grace_times(0.1, 0.1));
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, None);
    motor.has_floor = false;
    for _ in 0..3 {
        step(&mut controller, &mut motor, None);
    }
    assert!(!motor.grounding.is_stable_on_ground);

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!((motor.velocity.y - 20.0).abs() < 0.001);
}

#[test]
fn coyote_time_expires() {
    let config = no_drag(ControllerConfig::default().with_grace_times(0.1, 0.1));
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, None);
    motor.has_floor = false;
    for _ in 0..12 {
        step(&mut controller, &mut motor, None);
    }

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    assert!(motor.velocity.y < 0.0);
    assert!(motor.unground_calls.is_empty());
}

#[test]
fn buffered_jump_fires_on_landing() {
    let config = no_drag(ControllerConfig::default().with_grace_times(0.1, 0.1));
    let landing = landing_tick(config, 3.0);

    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::falling_from(3.0);
    for tick in 1..=landing + 1 {
        let input = (tick == landing - 3).then(|| InputSnapshot::new().with_jump_down());
        step(&mut controller, &mut motor, input);
        if tick <= landing {
            assert!(motor.unground_calls.is_empty(), "jumped early on tick {tick}");
        }
    }

    assert_eq!(motor.unground_calls.len(), 1);
    assert!(motor.velocity.y > 19.0);
}

#[test]
fn stale_buffered_jump_expires_before_landing() {
    let config = no_drag(ControllerConfig::default().with_grace_times(0.1, 0.1));
    let landing = landing_tick(config, 3.0);

    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::falling_from(3.0);
    for tick in 1..=landing + 3 {
        let input = (tick == landing - 8).then(|| InputSnapshot::new().with_jump_down());
        step(&mut controller, &mut motor, input);
    }

    assert!(motor.unground_calls.is_empty());
    assert!(!controller.jump_state().requested);
    assert!(motor.grounding.is_stable_on_ground);
}

#[test]
fn wall_jump_pushes_off_wall() {
    let config = no_drag(ControllerConfig::platformer().with_double_jump(false));
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    for _ in 0..5 {
        step(&mut controller, &mut motor, None);
    }

    motor.inject_wall_hit(Vec3::X);
    step(&mut controller, &mut motor, None);
    assert!(controller.jump_state().can_wall_jump);

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));

    assert!((motor.velocity - Vec3::new(20.0, 0.0, 0.0)).length() < 0.001);
    assert!(!controller.jump_state().can_wall_jump);
}

#[test]
fn wall_jump_window_is_one_tick() {
    let config = no_drag(ControllerConfig::platformer().with_double_jump(false));
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    for _ in 0..5 {
        step(&mut controller, &mut motor, None);
    }

    motor.inject_wall_hit(Vec3::X);
    step(&mut controller, &mut motor, None);
    step(&mut controller, &mut motor, None);
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));

    assert!(motor.velocity.x.abs() < 0.001);
    assert_eq!(motor.unground_calls.len(), 1);
}

#[test]
fn double_and_wall_jump_can_fire_in_the_same_tick() {
    let config = no_drag(ControllerConfig::platformer());
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));
    for _ in 0..5 {
        step(&mut controller, &mut motor, None);
    }

    motor.inject_wall_hit(Vec3::X);
    step(&mut controller, &mut motor, None);
    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_jump_down()));

    // The double jump runs first, then the wall jump replaces its vertical
    // component.
    assert!(controller.jump_state().double_jump_consumed);
    assert!((motor.velocity - Vec3::new(20.0, 0.0, 0.0)).length() < 0.001);
    assert_eq!(motor.unground_calls.len(), 3);
}

// ==================== Dashing ====================

#[test]
fn dash_charges_then_returns_to_default() {
    let config = ControllerConfig::default().with_dash(15.0, 0.25, 0.125);
    let mut controller = CharacterController::new(config);
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_dash_down()));
    assert_eq!(controller.mode(), CharacterMode::Dashing);
    assert_eq!(motor.velocity, Vec3::new(0.0, 0.0, -15.0));

    let mut ticks = 1;
    while controller.mode() == CharacterMode::Dashing {
        step(&mut controller, &mut motor, None);
        ticks += 1;
        assert!(ticks < 120, "dash never ended");
    }

    let elapsed = ticks as f32 * DT;
    assert!(elapsed > 0.25 + 0.125, "dash ended after {elapsed}s");
    assert!(elapsed < 0.25 + 0.125 + 3.0 * DT, "dash ended after {elapsed}s");

    // Distance covered is roughly charge speed times charge time.
    assert!((motor.position.z + 15.0 * 0.25).abs() < 15.0 * 2.0 * DT);
    assert_eq!(motor.velocity.x, 0.0);
    assert_eq!(motor.velocity.z, 0.0);
}

#[test]
fn dash_ignores_movement_and_jump_input() {
    let mut controller = CharacterController::new(ControllerConfig::default());
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_dash_down()));
    let input = InputSnapshot::new().with_move_axes(0.0, 1.0).with_jump_down();
    step(&mut controller, &mut motor, Some(input));

    assert_eq!(motor.velocity, Vec3::new(0.0, 0.0, -15.0));
    assert!(motor.unground_calls.is_empty());
    assert!(!controller.jump_state().requested);
}

#[test]
fn dash_into_wall_stops_immediately() {
    let mut controller = CharacterController::new(ControllerConfig::default());
    let mut motor = ScriptedMotor::on_floor();

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_dash_down()));
    motor.inject_wall_hit(Vec3::Z);
    step(&mut controller, &mut motor, None);
    assert!(controller.dash_state().stopped);

    step(&mut controller, &mut motor, None);
    assert_eq!(motor.velocity, Vec3::ZERO);
    assert_eq!(controller.mode(), CharacterMode::Dashing);
}

#[test]
fn dash_follows_character_facing() {
    let mut controller = CharacterController::new(ControllerConfig::default());
    let mut motor = ScriptedMotor::on_floor();
    motor.rotation = Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2);

    step(&mut controller, &mut motor, Some(InputSnapshot::new().with_dash_down()));

    assert!((motor.velocity - Vec3::new(15.0, 0.0, 0.0)).length() < 0.001);
}

// ==================== Movement ====================

#[test]
fn ground_movement_converges_to_max_speed() {
    let mut controller = CharacterController::new(ControllerConfig::default());
    let mut motor = ScriptedMotor::on_floor();

    let input = InputSnapshot::new().with_move_axes(1.0, 0.0);
    for _ in 0..120 {
        step(&mut controller, &mut motor, Some(input));
    }

    assert!((motor.velocity - Vec3::new(0.0, 0.0, -10.0)).length() < 0.01);
    assert!(motor.grounding.is_stable_on_ground);
}

#[test]
fn character_turns_toward_camera() {
    let mut controller = CharacterController::new(ControllerConfig::default());
    let mut motor = ScriptedMotor::on_floor();

    let camera = Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2);
    let input = InputSnapshot::new().with_camera_rotation(camera);
    for _ in 0..180 {
        step(&mut controller, &mut motor, Some(input));
    }

    assert!((motor.character_forward() - Vec3::X).length() < 0.01);
}

// ==================== Bevy integration ====================

fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(KinematicControllerPlugin::<ScriptedMotor>::default());
    app.insert_resource(Time::<Fixed>::from_hz(60.0));
    app
}

fn spawn_character(app: &mut App, config: ControllerConfig) -> Entity {
    app.world_mut()
        .spawn((
            CharacterController::new(config),
            CharacterInput::default(),
            ScriptedMotor::on_floor(),
        ))
        .id()
}

fn run_fixed_tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
}

#[test]
fn plugin_syncs_grounded_marker() {
    let mut app = create_test_app();
    let entity = spawn_character(&mut app, ControllerConfig::default());

    run_fixed_tick(&mut app);

    let world = app.world();
    assert!(world.get::<Grounded>(entity).is_some());
    assert!(world.get::<Airborne>(entity).is_none());
    assert!(world.get::<Dashing>(entity).is_none());
}

#[test]
fn plugin_consumes_input_and_jumps() {
    let mut app = create_test_app();
    let entity = spawn_character(&mut app, ControllerConfig::default());
    run_fixed_tick(&mut app);

    app.world_mut()
        .get_mut::<CharacterInput>(entity)
        .unwrap()
        .submit(InputSnapshot::new().with_jump_down());
    run_fixed_tick(&mut app);

    let world = app.world();
    assert!(!world.get::<CharacterInput>(entity).unwrap().has_pending());
    let motor = world.get::<ScriptedMotor>(entity).unwrap();
    assert!((motor.velocity.y - 20.0).abs() < 0.001);
    assert!(world.get::<Airborne>(entity).is_some());
    assert!(world.get::<Grounded>(entity).is_none());
}

#[test]
fn plugin_keeps_press_from_earlier_frame_before_tick() {
    let mut app = create_test_app();
    let entity = spawn_character(&mut app, ControllerConfig::default());
    run_fixed_tick(&mut app);

    // Two render frames arrive before the next fixed tick.
    {
        let mut input = app.world_mut().get_mut::<CharacterInput>(entity).unwrap();
        input.submit(InputSnapshot::new().with_jump_down());
        input.submit(InputSnapshot::new());
    }
    run_fixed_tick(&mut app);

    let motor = app.world().get::<ScriptedMotor>(entity).unwrap();
    assert_eq!(motor.unground_calls.len(), 1);
    assert!((motor.velocity.y - 20.0).abs() < 0.001);
}

#[test]
fn plugin_tracks_dashing_marker() {
    let mut app = create_test_app();
    let config = ControllerConfig::default().with_dash(15.0, 0.05, 0.05);
    let entity = spawn_character(&mut app, config);

    app.world_mut()
        .get_mut::<CharacterInput>(entity)
        .unwrap()
        .submit(InputSnapshot::new().with_dash_down());
    run_fixed_tick(&mut app);

    assert!(app.world().get::<Dashing>(entity).is_some());
    assert_eq!(
        app.world().get::<CharacterController>(entity).unwrap().mode(),
        CharacterMode::Dashing
    );

    for _ in 0..30 {
        run_fixed_tick(&mut app);
    }

    assert!(app.world().get::<Dashing>(entity).is_none());
    assert_eq!(
        app.world().get::<CharacterController>(entity).unwrap().mode(),
        CharacterMode::Default
    );
}
