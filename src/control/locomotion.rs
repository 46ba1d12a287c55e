//! Acceleration-limited planar velocity blending.
//!
//! Planar velocity moves toward the input-derived target with a
//! magnitude-limited vector step, so diagonal acceleration is no faster than
//! axis-aligned. Vertical velocity is never touched here.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

use crate::config::MovementConfig;

/// Magnitude-limited step of `current` toward `target`.
pub fn move_toward(current: Vector2<f32>, target: Vector2<f32>, max_delta: f32) -> Vector2<f32> {
    let diff = target - current;
    let dist = diff.norm();
    if dist <= max_delta || dist == 0.0 {
        target
    } else {
        current + diff * (max_delta / dist)
    }
}

/// World-space target planar velocity (x, z) for the current input.
/// `move_input` is x = strafe, y = forward along the body's local +Z.
pub fn target_velocity(
    config: &MovementConfig,
    orientation: &UnitQuaternion<f32>,
    move_input: Vector2<f32>,
    sprinting: bool,
) -> Vector2<f32> {
    let mut input = move_input;
    let magnitude = input.norm();
    if magnitude > 1.0 {
        input /= magnitude;
    }

    let world = orientation * Vector3::new(input.x, 0.0, input.y);
    let speed = if sprinting {
        config.sprint_speed
    } else {
        config.walk_speed
    };
    Vector2::new(world.x, world.z) * speed
}

/// Planar velocity after one tick of blending toward the input target.
/// Airborne control scales the acceleration budget by `air_control`.
pub fn solve_planar(
    config: &MovementConfig,
    orientation: &UnitQuaternion<f32>,
    current_planar: Vector2<f32>,
    move_input: Vector2<f32>,
    sprinting: bool,
    grounded: bool,
    dt: f32,
) -> Vector2<f32> {
    let target = target_velocity(config, orientation, move_input, sprinting);
    let control = if grounded { 1.0 } else { config.air_control };
    let max_speed_change = config.acceleration * control * dt.max(0.0);
    move_toward(current_planar, target, max_speed_change)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn config() -> MovementConfig {
        MovementConfig {
            walk_speed: 6.0,
            sprint_speed: 10.0,
            acceleration: 20.0,
            air_control: 0.5,
        }
    }

    fn identity() -> UnitQuaternion<f32> {
        UnitQuaternion::identity()
    }

    #[test]
    fn test_move_toward_limits_step_magnitude() {
        let stepped = move_toward(Vector2::zeros(), Vector2::new(10.0, 0.0), 3.0);
        assert!((stepped - Vector2::new(3.0, 0.0)).norm() < 1.0e-6);

        let reached = move_toward(Vector2::new(8.0, 0.0), Vector2::new(10.0, 0.0), 3.0);
        assert_eq!(reached, Vector2::new(10.0, 0.0));
    }

    #[test]
    fn test_diagonal_step_is_not_faster_than_axis_aligned() {
        let axis = move_toward(Vector2::zeros(), Vector2::new(10.0, 0.0), 2.0);
        let diagonal = move_toward(Vector2::zeros(), Vector2::new(10.0, 10.0), 2.0);
        assert!((axis.norm() - diagonal.norm()).abs() < 1.0e-6);
    }

    #[test]
    fn test_diagonal_input_matches_axis_aligned_target_speed() {
        let cfg = config();
        let diagonal = target_velocity(&cfg, &identity(), Vector2::new(1.0, 1.0), false);
        let axis = target_velocity(&cfg, &identity(), Vector2::new(1.0, 0.0), false);
        assert!((diagonal.norm() - axis.norm()).abs() < 1.0e-4);
        assert!((axis.norm() - cfg.walk_speed).abs() < 1.0e-4);
    }

    #[test]
    fn test_sprint_selects_sprint_speed() {
        let cfg = config();
        let target = target_velocity(&cfg, &identity(), Vector2::new(0.0, 1.0), true);
        assert!((target.norm() - cfg.sprint_speed).abs() < 1.0e-4);
    }

    #[test]
    fn test_orientation_rotates_target_into_world_space() {
        let cfg = config();
        // Yaw of +90° about Y turns local +Z forward into world +X.
        let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2);
        let target = target_velocity(&cfg, &yaw, Vector2::new(0.0, 1.0), false);
        assert!((target.x - cfg.walk_speed).abs() < 1.0e-4, "target {:?}", target);
        assert!(target.y.abs() < 1.0e-4);
    }

    #[test]
    fn test_air_control_halves_delta() {
        let cfg = config();
        let dt = 1.0 / 60.0;
        let input = Vector2::new(0.0, 1.0);

        let grounded = solve_planar(&cfg, &identity(), Vector2::zeros(), input, false, true, dt);
        let airborne = solve_planar(&cfg, &identity(), Vector2::zeros(), input, false, false, dt);

        assert!((grounded.norm() - 2.0 * airborne.norm()).abs() < 1.0e-5);
    }

    #[test]
    fn test_zero_input_converges_to_rest_within_budget() {
        let cfg = config();
        let dt = 1.0 / 60.0;
        let mut planar = Vector2::new(cfg.walk_speed, 0.0);

        // walk_speed / acceleration seconds is the worst-case stop time; one
        // extra tick absorbs float rounding in the per-step budget.
        let ticks = (cfg.walk_speed / cfg.acceleration / dt).ceil() as usize + 1;
        let mut previous_speed = planar.norm();
        for _ in 0..ticks {
            planar = solve_planar(&cfg, &identity(), planar, Vector2::zeros(), false, true, dt);
            let speed = planar.norm();
            assert!(speed <= previous_speed + 1.0e-6, "speed must not increase");
            previous_speed = speed;
        }
        assert_eq!(planar, Vector2::zeros());
    }

    #[test]
    fn test_negative_dt_does_not_reverse_motion() {
        let cfg = config();
        let planar = Vector2::new(3.0, 0.0);
        let result = solve_planar(
            &cfg,
            &identity(),
            planar,
            Vector2::new(0.0, 1.0),
            false,
            true,
            -0.1,
        );
        assert_eq!(result, planar);
    }
}
