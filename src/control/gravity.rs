//! Asymmetric vertical acceleration: scaled fall gravity with a grounded
//! settle clamp that keeps contact stable instead of flickering around zero.

use crate::config::JumpConfig;
use crate::constants::{locomotion as consts, physics as physics_consts};

/// Effective downward gravity magnitude for this controller, always positive.
/// A zero world gravity reading substitutes the default constant so jump math
/// never divides by or square-roots zero.
pub fn effective_gravity(config: &JumpConfig, world_gravity_y: f32) -> f32 {
    let mut gravity = world_gravity_y.abs() * config.gravity_multiplier;
    if gravity <= 0.0 {
        gravity = physics_consts::DEFAULT_GRAVITY * config.gravity_multiplier;
    }
    gravity.max(physics_consts::GRAVITY_EPSILON)
}

/// Vertical velocity after one tick of gravity. Grounded and descending
/// clamps to the settle velocity; otherwise the scaled gravity integrates.
pub fn integrate(
    config: &JumpConfig,
    grounded: bool,
    vertical_velocity: f32,
    world_gravity_y: f32,
    dt: f32,
) -> f32 {
    if grounded && vertical_velocity < 0.0 {
        consts::GROUNDED_SETTLE_VELOCITY
    } else {
        vertical_velocity - effective_gravity(config, world_gravity_y) * dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grounded_descent_clamps_to_settle_velocity() {
        let config = JumpConfig::default();
        let v = integrate(&config, true, -8.0, -9.81, 1.0 / 60.0);
        assert_eq!(v, consts::GROUNDED_SETTLE_VELOCITY);
    }

    #[test]
    fn test_grounded_ascent_still_integrates() {
        // Just after a jump leaves the pad the velocity is positive; the
        // clamp must not swallow it.
        let config = JumpConfig {
            gravity_multiplier: 1.0,
            ..JumpConfig::default()
        };
        let dt = 1.0 / 60.0;
        let v = integrate(&config, true, 5.0, -9.81, dt);
        assert!((v - (5.0 - 9.81 * dt)).abs() < 1.0e-5);
    }

    #[test]
    fn test_airborne_integration_uses_multiplier() {
        let config = JumpConfig {
            gravity_multiplier: 1.5,
            ..JumpConfig::default()
        };
        let dt = 0.1;
        let v = integrate(&config, false, 0.0, -9.81, dt);
        assert!((v - (-9.81 * 1.5 * dt)).abs() < 1.0e-5);
    }

    #[test]
    fn test_zero_world_gravity_falls_back_to_default() {
        let config = JumpConfig {
            gravity_multiplier: 2.0,
            ..JumpConfig::default()
        };
        let g = effective_gravity(&config, 0.0);
        assert!((g - physics_consts::DEFAULT_GRAVITY * 2.0).abs() < 1.0e-5);
    }

    #[test]
    fn test_zero_multiplier_floors_at_epsilon() {
        let config = JumpConfig {
            gravity_multiplier: 0.0,
            ..JumpConfig::default()
        };
        assert_eq!(
            effective_gravity(&config, -9.81),
            physics_consts::GRAVITY_EPSILON
        );
    }
}
