//! Buffered-press + coyote-time jump scheduling.
//!
//! Both grace windows are pure timestamp comparisons against "now": a press
//! stays buffered for `jump_buffer_seconds`, and ground contact keeps a jump
//! permitted for `coyote_seconds` after it is lost. A jump fires on the first
//! tick where both windows are open at once.

use crate::config::JumpConfig;

use super::gravity;

/// Launch velocity if a buffered press and coyote eligibility line up at
/// `now`, derived from the apex-height kinematics `v = sqrt(2 * g * h)`.
///
/// The caller owns the side effects of a fired jump: consume the buffered
/// press, force the grounded flag off, and skip gravity integration for the
/// tick. Timestamps of negative infinity ("no pending press" / "never
/// grounded") compare as outside both windows.
pub fn try_fire(
    config: &JumpConfig,
    now: f32,
    last_jump_press: f32,
    last_grounded: f32,
    world_gravity_y: f32,
) -> Option<f32> {
    let buffered = now - last_jump_press <= config.jump_buffer_seconds;
    let coyote_eligible = now - last_grounded <= config.coyote_seconds;
    if !buffered || !coyote_eligible {
        return None;
    }

    let gravity = gravity::effective_gravity(config, world_gravity_y);
    Some((2.0 * gravity * config.jump_height).sqrt())
}
