//! Per-frame bridge from the tornado field to every dynamic body.

use engine_core::Vec3;
use hecs::World;
use physics::{PhysicsWorld, RigidBodyHandle};
use rand::prelude::*;
use vortex::{FieldSample, TornadoField};

/// Link from a scene entity to its rigid body and the mass the field sees.
#[derive(Debug, Clone, Copy)]
pub struct BodyRef {
    pub handle: RigidBodyHandle,
    pub mass: f32,
}

/// Fixed chaotic spin axis rolled once per fragment at creation.
#[derive(Debug, Clone, Copy)]
pub struct FragmentSpin {
    pub axis: Vec3,
}

/// Height above a body's center where the horizontal field force is applied.
/// Off-center application makes bodies tumble and roll instead of sliding;
/// applying everything at the center of mass would produce no torque at all.
const LEVER_HEIGHT: f32 = 0.5;

/// Chaotic fragment torque magnitude at the field axis.
const FRAGMENT_TORQUE: f32 = 25.0;

/// Queries the field for every registered dynamic body each frame and feeds
/// the resulting forces/torques into the physics world.
pub struct ForceApplicationBridge {
    rng: StdRng,
}

impl Default for ForceApplicationBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl ForceApplicationBridge {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Apply the field sample to every body carrying a [`BodyRef`].
    ///
    /// The sample is split: vertical lift goes through the body center
    /// (no induced torque), the horizontal component is applied above the
    /// center to induce tumbling, and the field torque is added directly.
    pub fn apply(&mut self, world: &World, field: &TornadoField, physics: &mut PhysicsWorld) {
        for (_, body_ref) in world.query::<&BodyRef>().iter() {
            let Some(transform) = physics.get_body_transform(body_ref.handle) else {
                continue;
            };
            // Field forces are re-derived from scratch every frame.
            physics.reset_forces(body_ref.handle);

            let sample = field.force_at(transform.position, body_ref.mass);
            if sample == FieldSample::ZERO {
                continue;
            }

            let lift = Vec3::new(0.0, sample.force.y, 0.0);
            physics.apply_force_at_point(body_ref.handle, lift, transform.position);

            let horizontal = Vec3::new(sample.force.x, 0.0, sample.force.z);
            physics.apply_force_at_point(
                body_ref.handle,
                horizontal,
                transform.position + Vec3::Y * LEVER_HEIGHT,
            );

            physics.add_torque(body_ref.handle, sample.torque);
        }
    }

    /// Chaotic torque on fragments caught inside the field, scaled by the
    /// field's falloff so settled piles outside the radius stay at rest.
    pub fn spin_fragments(
        &mut self,
        world: &World,
        field: &TornadoField,
        physics: &mut PhysicsWorld,
    ) {
        for (_, (body_ref, spin)) in world.query::<(&BodyRef, &FragmentSpin)>().iter() {
            let Some(transform) = physics.get_body_transform(body_ref.handle) else {
                continue;
            };
            let falloff = field.falloff(transform.position);
            if falloff <= 0.0 {
                continue;
            }
            let jitter = self.rng.gen_range(0.5..1.0);
            physics.add_torque(body_ref.handle, spin.axis * (FRAGMENT_TORQUE * falloff * jitter));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use vortex::FieldParams;

    fn spawn_box(world: &mut World, physics: &mut PhysicsWorld, position: Vec3, mass: f32) -> RigidBodyHandle {
        let handle = physics.add_dynamic_box(
            position,
            Quat::IDENTITY,
            Vec3::splat(0.5),
            mass,
            0.5,
            0.1,
            0.0,
            0.0,
        );
        world.spawn((BodyRef { handle, mass },));
        handle
    }

    #[test]
    fn light_body_inside_field_is_lofted() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let field = TornadoField::new(
            Vec3::ZERO,
            FieldParams {
                particle_count: 4,
                ..FieldParams::default()
            },
        );
        // Halfway out: falloff 0.25, lift 200*0.25/1 = 50 N on 1 kg beats gravity.
        let handle = spawn_box(&mut world, &mut physics, Vec3::new(15.0, 2.0, 0.0), 1.0);
        let mut bridge = ForceApplicationBridge::with_seed(1);

        // Few steps: the field flings bodies hard enough to exit the radius
        // quickly, after which gravity would erode the vertical velocity.
        for _ in 0..2 {
            bridge.apply(&world, &field, &mut physics);
            physics.step();
        }
        let body = physics.rigid_body_set.get(handle).unwrap();
        assert!(body.linvel().y > 0.0, "lift should beat gravity for a 1 kg body");
        assert!(body.angvel().magnitude() > 0.0, "field torque should spin the body");
    }

    #[test]
    fn body_outside_field_only_falls() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let field = TornadoField::new(
            Vec3::ZERO,
            FieldParams {
                particle_count: 4,
                ..FieldParams::default()
            },
        );
        let handle = spawn_box(&mut world, &mut physics, Vec3::new(100.0, 10.0, 0.0), 1.0);
        let mut bridge = ForceApplicationBridge::with_seed(2);

        for _ in 0..10 {
            bridge.apply(&world, &field, &mut physics);
            physics.step();
        }
        let body = physics.rigid_body_set.get(handle).unwrap();
        assert!(body.linvel().y < 0.0);
        assert!(body.linvel().x.abs() < 1e-6);
        assert!(body.linvel().z.abs() < 1e-6);
    }

    #[test]
    fn fragment_spin_only_acts_inside_field() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let field = TornadoField::new(
            Vec3::ZERO,
            FieldParams {
                particle_count: 4,
                ..FieldParams::default()
            },
        );
        let far = physics.add_dynamic_box(
            Vec3::new(200.0, 1.0, 0.0),
            Quat::IDENTITY,
            Vec3::splat(0.3),
            2.0,
            0.5,
            0.1,
            0.0,
            0.0,
        );
        world.spawn((
            BodyRef { handle: far, mass: 2.0 },
            FragmentSpin { axis: Vec3::Y },
        ));
        let mut bridge = ForceApplicationBridge::with_seed(3);
        bridge.spin_fragments(&world, &field, &mut physics);
        physics.step();
        let body = physics.rigid_body_set.get(far).unwrap();
        assert!(body.angvel().magnitude() < 1e-6);
    }
}
