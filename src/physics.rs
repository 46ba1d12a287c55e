//! Wrapper around the Rapier3D physics world the controller runs against.
//! Exposes only what the locomotion core consumes: body velocity/pose access,
//! the world gravity vector, static geometry registration, and a group-filtered
//! sphere-overlap ground query that ignores sensor (trigger) colliders.

use nalgebra::{Point3, UnitQuaternion, Vector3};
use rapier3d::prelude::*;

use crate::constants::physics as consts;

// Collision groups: characters collide with static geometry only, and the
// ground probe tests against static geometry only.
pub const GROUP_STATIC: Group = Group::GROUP_1; // Walls, floors, obstacles
pub const GROUP_CHARACTER: Group = Group::GROUP_2; // Character bodies

/// Shape of a registered world-geometry part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartShape {
    Cuboid,
    Ball,
}

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

/// Builds a collider for a static world-geometry part.
fn build_part_collider(size: [f32; 3], shape: PartShape, solid: bool) -> Collider {
    let [sx, sy, sz] = size;
    let shared_shape = match shape {
        PartShape::Cuboid => SharedShape::cuboid(sx / 2.0, sy / 2.0, sz / 2.0),
        PartShape::Ball => SharedShape::ball(sx / 2.0),
    };
    ColliderBuilder::new(shared_shape)
        .sensor(!solid)
        .collision_groups(InteractionGroups::new(GROUP_STATIC, Group::ALL))
        .build()
}

impl PhysicsWorld {
    /// Creates a new physics world with default downward gravity
    pub fn new() -> Self {
        Self {
            gravity: vector![0.0, -consts::DEFAULT_GRAVITY, 0.0],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Sets the downward gravity magnitude for the world
    pub fn set_gravity_y(&mut self, gravity_y: f32) {
        self.gravity = vector![0.0, -gravity_y, 0.0];
    }

    /// Signed vertical component of the world gravity vector
    pub fn gravity_y(&self) -> f32 {
        self.gravity.y
    }

    /// Steps the physics simulation forward by dt seconds
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Rebuilds query acceleration structures after collider changes, so
    /// overlap queries see the current world before the next step.
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Adds a fixed world-geometry part. Parts with `solid = false` become
    /// sensors (trigger volumes) that never count as ground.
    pub fn add_part(
        &mut self,
        position: [f32; 3],
        size: [f32; 3],
        shape: PartShape,
        solid: bool,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![position[0], position[1], position[2]])
            .build();
        let handle = self.rigid_body_set.insert(body);

        let collider = build_part_collider(size, shape, solid);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Adds a character body: dynamic, rotation-locked, with world gravity
    /// disabled since the controller integrates its own.
    ///
    /// The capsule collider carries zero friction with a min combine rule:
    /// the controller owns planar velocity, and solver friction would fight
    /// every tick's write-back.
    pub fn add_character(
        &mut self,
        position: [f32; 3],
        radius: f32,
        height: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .gravity_scale(0.0)
            .lock_rotations()
            .build();
        let handle = self.rigid_body_set.insert(body);

        let half_height = (height - 2.0 * radius).max(0.0) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(InteractionGroups::new(GROUP_CHARACTER, GROUP_STATIC))
            .friction(0.0)
            .friction_combine_rule(CoefficientCombineRule::Min)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        handle
    }

    /// Disables world gravity and locks rotations on an externally created
    /// body so the controller can drive it.
    pub fn prepare_character_body(&mut self, handle: RigidBodyHandle) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };
        body.set_gravity_scale(0.0, true);
        body.lock_rotations(true, true);
        true
    }

    /// Removes a body and its colliders from the world
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    /// Gets the linear velocity of a body
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vector3<f32>> {
        self.rigid_body_set.get(handle).map(|body| *body.linvel())
    }

    /// Sets the linear velocity of a body
    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vector3<f32>) -> bool {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return false;
        };
        body.set_linvel(velocity, true);
        true
    }

    /// Gets the world-space position of a body
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Point3<f32>> {
        self.rigid_body_set
            .get(handle)
            .map(|body| Point3::from(*body.translation()))
    }

    /// Gets the orientation of a body
    pub fn body_rotation(&self, handle: RigidBodyHandle) -> Option<UnitQuaternion<f32>> {
        self.rigid_body_set.get(handle).map(|body| *body.rotation())
    }

    /// Sphere-overlap test against colliders whose memberships intersect
    /// `ground_groups`. Sensors are excluded, as is `exclude` (normally the
    /// querying character's own body). Returns true on the first hit.
    pub fn check_sphere(
        &self,
        center: Point3<f32>,
        radius: f32,
        ground_groups: Group,
        exclude: Option<RigidBodyHandle>,
    ) -> bool {
        let shape = Ball::new(radius.max(0.0));
        let position = Isometry::translation(center.x, center.y, center.z);

        let mut filter = QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(GROUP_CHARACTER, ground_groups));
        if let Some(handle) = exclude {
            filter = filter.exclude_rigid_body(handle);
        }

        let mut hit = false;
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &position,
            &shape,
            filter,
            |_collider| {
                hit = true;
                false // stop at the first overlap
            },
        );
        hit
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
