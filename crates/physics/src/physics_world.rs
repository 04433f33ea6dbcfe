//! Physics world management with Rapier3D.

use engine_core::{Transform, Vec3};
use glam::Quat;
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
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

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with default gravity.
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.81, 0.0],
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

    /// Step the physics simulation by one fixed sub-step.
    pub fn step(&mut self) {
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

    /// Number of rigid bodies currently registered. Used by leak checks and
    /// the demo's stats overlay.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    /// Add a dynamic box-shaped body with an explicit mass and material.
    ///
    /// The collider's mass is set directly (not derived from density) so the
    /// field's inverse-mass force law sees exactly the configured mass.
    #[allow(clippy::too_many_arguments)]
    pub fn add_dynamic_box(
        &mut self,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec3,
        mass: f32,
        friction: f32,
        restitution: f32,
        linear_damping: f32,
        angular_damping: f32,
    ) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .rotation(quat_to_axis_angle(rotation))
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .mass(mass)
            .friction(friction)
            .restitution(restitution)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Add a static box body (intact buildings). Returns the body handle so
    /// the whole building can be removed in one call later.
    pub fn add_static_box(
        &mut self,
        position: Vec3,
        rotation: Quat,
        half_extents: Vec3,
    ) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::fixed()
            .translation(vector![position.x, position.y, position.z])
            .rotation(quat_to_axis_angle(rotation))
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);
        let collider =
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis()).build();
        self.collider_set.insert(collider)
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            let rot = body.rotation();
            Transform {
                position: Vec3::new(pos.x, pos.y, pos.z),
                rotation: Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
                scale: Vec3::ONE,
            }
        })
    }

    /// Get a body's mass as seen by the solver.
    pub fn body_mass(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.rigid_body_set.get(handle).map(|body| body.mass())
    }

    /// Clear a body's persistent force and torque accumulators. Rapier keeps
    /// `add_force` contributions across steps; the bridge re-derives field
    /// forces every frame, so it resets before applying.
    pub fn reset_forces(&mut self, handle: RigidBodyHandle) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(true);
            body.reset_torques(true);
        }
    }

    /// Apply a force at a world-space point (off-center points induce torque).
    pub fn apply_force_at_point(&mut self, handle: RigidBodyHandle, force: Vec3, point: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_force_at_point(
                vector![force.x, force.y, force.z],
                point![point.x, point.y, point.z],
                true,
            );
        }
    }

    /// Add a torque to a body's angular accumulator.
    pub fn add_torque(&mut self, handle: RigidBodyHandle, torque: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.add_torque(vector![torque.x, torque.y, torque.z], true);
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

/// Rapier's builders take rotations as a scaled axis-angle vector.
fn quat_to_axis_angle(q: Quat) -> Vector<Real> {
    let (axis, angle) = q.to_axis_angle();
    let scaled = axis * angle;
    vector![scaled.x, scaled.y, scaled.z]
}
