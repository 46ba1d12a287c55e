//! Per-frame input normalization and jump edge detection.

use nalgebra::Vector2;

use crate::constants::locomotion as consts;

/// Named input actions the controller reads. Backends (devices, replays,
/// scripted tests) implement this; binding and enabling happen externally.
pub trait InputActionSource {
    /// Current 2D move value, x = strafe, y = forward
    fn move_axis(&self) -> [f32; 2];
    /// Whether the jump button is currently held
    fn jump_held(&self) -> bool;
    /// Current analog sprint value; digital backends report 0.0 or 1.0
    fn sprint_axis(&self) -> f32;
}

/// One normalized input sample, produced once per variable-rate frame.
#[derive(Debug, Clone, Copy)]
pub struct InputSample {
    /// Planar move input, magnitude clamped to 1
    pub move_input: Vector2<f32>,
    pub sprinting: bool,
    /// Rising edge: fires exactly once per physical press, never on hold
    pub jump_pressed: bool,
    /// Falling edge: fires once when the button is let go
    pub jump_released: bool,
}

/// Edge-detecting sampler bridging frame-rate input to the fixed tick.
#[derive(Debug, Default)]
pub struct InputSampler {
    prev_jump_held: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the source once and derives press/release edges against the
    /// previous frame's held state.
    pub fn sample(&mut self, source: &dyn InputActionSource) -> InputSample {
        let axis = source.move_axis();
        let held = source.jump_held();

        let jump_pressed = held && !self.prev_jump_held;
        let jump_released = !held && self.prev_jump_held;
        self.prev_jump_held = held;

        let mut move_input = Vector2::new(axis[0], axis[1]);
        if !move_input.x.is_finite() || !move_input.y.is_finite() {
            move_input = Vector2::zeros();
        }
        let magnitude = move_input.norm();
        if magnitude > 1.0 {
            move_input /= magnitude;
        }

        InputSample {
            move_input,
            sprinting: source.sprint_axis() > consts::SPRINT_THRESHOLD,
            jump_pressed,
            jump_released,
        }
    }

    /// Forget the held state, so the next sample cannot produce a stale
    /// release edge.
    pub fn reset(&mut self) {
        self.prev_jump_held = false;
    }
}
