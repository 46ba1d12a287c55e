//! Sphere-overlap ground sensing beneath the character.

use nalgebra::{Point3, Vector3};
use rapier3d::prelude::RigidBodyHandle;

use crate::config::GroundProbeConfig;
use crate::physics::PhysicsWorld;

/// World-space center of the probe sphere: the body origin plus the configured
/// offset rotated by the body orientation.
pub fn probe_center(
    physics: &PhysicsWorld,
    body: RigidBodyHandle,
    config: &GroundProbeConfig,
) -> Option<Point3<f32>> {
    let position = physics.body_position(body)?;
    let rotation = physics.body_rotation(body)?;
    let offset = Vector3::new(config.offset[0], config.offset[1], config.offset[2]);
    Some(position + rotation * offset)
}

/// Overlap test against the configured ground filter. Sensors and the
/// character's own collider never count; any query failure (missing body,
/// empty filter) reads as airborne rather than an error.
pub fn probe(physics: &PhysicsWorld, body: RigidBodyHandle, config: &GroundProbeConfig) -> bool {
    let Some(filter) = config.ground_filter() else {
        return false;
    };
    let Some(center) = probe_center(physics, body, config) else {
        return false;
    };
    physics.check_sphere(center, config.radius, filter, Some(body))
}
