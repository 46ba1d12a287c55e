//! Fixed-timestep character locomotion and jump-timing controller.
//!
//! Converts per-frame input samples and a sphere ground probe into a single
//! rigid-body velocity update per physics tick: buffered jump presses,
//! coyote-time grace, acceleration-limited planar blending, and asymmetric
//! gravity, on top of a Rapier3D world that handles collision itself.

pub mod config;
pub mod constants;
pub mod control;
pub mod physics;

pub use config::{ConfigError, ControllerConfig, GroundProbeConfig, JumpConfig, MovementConfig};
pub use control::{CharacterController, CharacterState, InputActionSource, InputSample, InputSampler};
pub use physics::{PartShape, PhysicsWorld};
