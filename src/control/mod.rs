//! Character locomotion control core.
//!
//! One `CharacterController` drives one rigid body. The host calls
//! [`CharacterController::sample_input`] once per render frame and
//! [`CharacterController::tick`] once per fixed physics step; both clocks
//! share the same timebase for their `now` arguments. Within a tick the
//! pipeline runs ground sensing, jump scheduling, planar blending, and
//! vertical integration in that order, then writes the body velocity back
//! exactly once.
//!
//! Missing collaborators (unbound body, detached input source, empty ground
//! filter) degrade the affected stage to a no-op: the loop keeps ticking and
//! resumes normal behavior as soon as the dependency appears.

pub mod gravity;
pub mod ground;
pub mod input;
pub mod jump;
pub mod locomotion;

use nalgebra::{Point3, UnitQuaternion, Vector2, Vector3};
use rapier3d::prelude::RigidBodyHandle;

use crate::config::{
    ConfigError, ControllerConfig, GroundProbeConfig, JumpConfig, MovementConfig,
};
use crate::constants::locomotion as consts;
use crate::physics::PhysicsWorld;

pub use input::{InputActionSource, InputSample, InputSampler};

/// Authoritative per-character motion state, mutated once per tick.
#[derive(Debug, Clone, Copy)]
pub struct CharacterState {
    /// Planar velocity (x, z), written back to the rigid body each tick
    pub planar_velocity: Vector2<f32>,
    /// Vertical velocity (y)
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Tick-clock time of the last positive ground contact
    pub last_grounded: f32,
    /// Frame-clock time of the last jump press; negative infinity means no
    /// pending press
    pub last_jump_press: f32,
    /// Latest normalized move input, magnitude <= 1
    pub move_input: Vector2<f32>,
    pub sprinting: bool,
}

impl CharacterState {
    fn new() -> Self {
        Self {
            planar_velocity: Vector2::zeros(),
            vertical_velocity: 0.0,
            grounded: false,
            last_grounded: f32::NEG_INFINITY,
            last_jump_press: f32::NEG_INFINITY,
            move_input: Vector2::zeros(),
            sprinting: false,
        }
    }
}

/// Fixed-timestep locomotion and jump-timing controller for one character.
pub struct CharacterController {
    movement: MovementConfig,
    jump: JumpConfig,
    ground_probe: GroundProbeConfig,
    state: CharacterState,
    sampler: InputSampler,
    body: Option<RigidBodyHandle>,
    input: Option<Box<dyn InputActionSource>>,
    warned_missing_body: bool,
    warned_missing_input: bool,
    warned_missing_filter: bool,
}

impl CharacterController {
    /// Creates a controller from validated configuration. Body and input
    /// source are injected separately via [`bind_body`](Self::bind_body) and
    /// [`attach_input`](Self::attach_input).
    pub fn new(
        movement: MovementConfig,
        jump: JumpConfig,
        ground_probe: GroundProbeConfig,
    ) -> Result<Self, ConfigError> {
        movement.validate()?;
        jump.validate()?;
        ground_probe.validate()?;
        Ok(Self {
            movement,
            jump,
            ground_probe,
            state: CharacterState::new(),
            sampler: InputSampler::new(),
            body: None,
            input: None,
            warned_missing_body: false,
            warned_missing_input: false,
            warned_missing_filter: false,
        })
    }

    /// Creates a controller from an aggregated config (e.g. controller.toml).
    pub fn from_config(config: ControllerConfig) -> Result<Self, ConfigError> {
        Self::new(config.movement, config.jump, config.ground_probe)
    }

    /// Binds the rigid body this controller drives, disabling world gravity
    /// and locking rotations on it. The body keeps colliding normally; only
    /// its velocity is authored here.
    pub fn bind_body(&mut self, physics: &mut PhysicsWorld, handle: RigidBodyHandle) {
        physics.prepare_character_body(handle);
        self.body = Some(handle);
        self.warned_missing_body = false;
    }

    pub fn unbind_body(&mut self) {
        self.body = None;
    }

    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    /// Attaches the input action source read by `sample_input`.
    pub fn attach_input(&mut self, source: Box<dyn InputActionSource>) {
        self.input = Some(source);
        self.sampler.reset();
        self.warned_missing_input = false;
    }

    /// Deactivation hook: detaches input and clears any pending buffered
    /// press so a stale press cannot fire on reactivation.
    pub fn shutdown(&mut self) {
        self.input = None;
        self.sampler.reset();
        self.state.last_jump_press = f32::NEG_INFINITY;
    }

    /// Swaps movement tuning; rejected values leave the prior config live.
    pub fn set_movement_config(&mut self, config: MovementConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.movement = config;
        Ok(())
    }

    /// Swaps jump tuning; rejected values leave the prior config live.
    pub fn set_jump_config(&mut self, config: JumpConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.jump = config;
        Ok(())
    }

    /// Swaps probe tuning; rejected values leave the prior config live.
    pub fn set_ground_probe_config(
        &mut self,
        config: GroundProbeConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.ground_probe = config;
        Ok(())
    }

    pub fn movement_config(&self) -> &MovementConfig {
        &self.movement
    }

    pub fn jump_config(&self) -> &JumpConfig {
        &self.jump
    }

    pub fn ground_probe_config(&self) -> &GroundProbeConfig {
        &self.ground_probe
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn is_grounded(&self) -> bool {
        self.state.grounded
    }

    /// Current probe sphere (center, radius) for external visualization.
    pub fn ground_probe_shape(&self, physics: &PhysicsWorld) -> Option<(Point3<f32>, f32)> {
        let body = self.body?;
        let center = ground::probe_center(physics, body, &self.ground_probe)?;
        Some((center, self.ground_probe.radius))
    }

    /// Variable-rate entry point: reads the input source once, records jump
    /// press timestamps, and applies the short-hop cut on release.
    pub fn sample_input(&mut self, physics: &mut PhysicsWorld, frame_now: f32) {
        let Some(source) = self.input.as_deref() else {
            warn_once(
                &mut self.warned_missing_input,
                "No input source attached; input sampling idle",
            );
            return;
        };
        let sample = self.sampler.sample(source);

        self.state.move_input = sample.move_input;
        self.state.sprinting = sample.sprinting;

        if sample.jump_pressed {
            self.state.last_jump_press = frame_now;
        }
        if sample.jump_released {
            self.cut_jump_short(physics);
        }
    }

    /// Releasing jump while ascending halves the upward velocity, applied to
    /// the body immediately at frame rate rather than at the next tick.
    fn cut_jump_short(&mut self, physics: &mut PhysicsWorld) {
        let Some(body) = self.body else {
            return;
        };
        let Some(mut velocity) = physics.body_velocity(body) else {
            return;
        };
        if velocity.y > 0.0 {
            velocity.y *= consts::SHORT_HOP_FACTOR;
            physics.set_body_velocity(body, velocity);
        }
    }

    /// Fixed-step entry point. Runs the full pipeline and writes the body
    /// velocity back exactly once; config swaps made since the last call take
    /// effect here.
    pub fn tick(&mut self, physics: &mut PhysicsWorld, dt: f32, now: f32) {
        let Some(body) = self.body else {
            warn_once(
                &mut self.warned_missing_body,
                "No rigid body bound; controller idle",
            );
            return;
        };
        let Some(velocity) = physics.body_velocity(body) else {
            warn_once(
                &mut self.warned_missing_body,
                "Bound rigid body is gone; controller idle",
            );
            return;
        };
        self.state.planar_velocity = Vector2::new(velocity.x, velocity.z);
        self.state.vertical_velocity = velocity.y;

        // Ground sensor.
        if self.ground_probe.ground_filter().is_none() {
            warn_once(
                &mut self.warned_missing_filter,
                "Ground filter selects no groups; character reads as airborne",
            );
        }
        self.state.grounded = ground::probe(physics, body, &self.ground_probe);
        if self.state.grounded {
            self.state.last_grounded = now;
        }

        // Jump scheduler: consumes the buffered press and pre-empts this
        // tick's gravity when it fires.
        let mut jump_fired = false;
        if let Some(launch_velocity) = jump::try_fire(
            &self.jump,
            now,
            self.state.last_jump_press,
            self.state.last_grounded,
            physics.gravity_y(),
        ) {
            self.state.vertical_velocity = launch_velocity;
            self.state.last_jump_press = f32::NEG_INFINITY;
            self.state.grounded = false;
            jump_fired = true;
        }

        // Planar blending in the body's current basis.
        let orientation = physics
            .body_rotation(body)
            .unwrap_or_else(UnitQuaternion::identity);
        self.state.planar_velocity = locomotion::solve_planar(
            &self.movement,
            &orientation,
            self.state.planar_velocity,
            self.state.move_input,
            self.state.sprinting,
            self.state.grounded,
            dt,
        );

        // Vertical integration, skipped on the tick a jump just fired so the
        // launch velocity survives intact.
        if !jump_fired {
            self.state.vertical_velocity = gravity::integrate(
                &self.jump,
                self.state.grounded,
                self.state.vertical_velocity,
                physics.gravity_y(),
                dt,
            );
        }

        // Single velocity write-back.
        physics.set_body_velocity(
            body,
            Vector3::new(
                self.state.planar_velocity.x,
                self.state.vertical_velocity,
                self.state.planar_velocity.y,
            ),
        );
    }
}

fn warn_once(flag: &mut bool, message: &str) {
    if !*flag {
        eprintln!("[Controller] {}", message);
        *flag = true;
    }
}
