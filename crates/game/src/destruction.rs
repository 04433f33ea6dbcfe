//! Procedural destruction: turning intact buildings into physics fragments.

use assets::{Model, SpawnOptions};
use engine_core::{MeshInstance, Transform, Vec3};
use hecs::World;
use physics::PhysicsWorld;
use rand::prelude::*;

use crate::buildings::{Building, BuildingState, Fragment};
use crate::forces::{BodyRef, FragmentSpin};

/// Fragment colliders are shrunk relative to their visual bounds so adjacent
/// pieces separate cleanly once physics takes over.
const COLLIDER_SHRINK: f32 = 0.85;
/// Small upward nudge so fragments never start interpenetrating the ground.
const GROUND_CLEARANCE: f32 = 0.05;
/// Damping so freshly shattered piles settle instead of sliding forever.
const FRAGMENT_LINEAR_DAMPING: f32 = 0.05;
const FRAGMENT_ANGULAR_DAMPING: f32 = 0.3;

/// Converts a building's pre-authored broken model into independently-moving
/// fragments, one dynamic body per piece.
pub struct DestructionPipeline {
    rng: StdRng,
}

impl Default for DestructionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl DestructionPipeline {
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

    /// Intact → Damaged transition. Idempotent: invoking it on an
    /// already-damaged building is a no-op.
    ///
    /// Each piece arrives pivot-corrected from the asset layer (geometry
    /// re-origined on its bounding-box center), so the synthesized body's
    /// implied center of mass lands exactly on the visual center: world
    /// position = building origin + rotate(piece center, orientation).
    pub fn shatter(
        &mut self,
        building: &mut Building,
        broken: &Model,
        debris_mass: f32,
        defaults: &SpawnOptions,
        world: &mut World,
        physics: &mut PhysicsWorld,
    ) {
        if building.state == BuildingState::Damaged {
            return;
        }

        // Tear down the intact representation.
        if let Some(body) = building.body.take() {
            physics.remove_body(body);
        }
        world.despawn(building.visual).ok();

        let origin = building.origin;
        let mut fragments = Vec::with_capacity(broken.pieces.len());
        for (i, piece) in broken.pieces.iter().enumerate() {
            let position =
                origin.transform_point(piece.center) + Vec3::Y * GROUND_CLEARANCE;
            let rotation = origin.rotation;

            let body = physics.add_dynamic_box(
                position,
                rotation,
                piece.half_extents * COLLIDER_SHRINK,
                debris_mass,
                defaults.friction,
                defaults.restitution,
                FRAGMENT_LINEAR_DAMPING,
                FRAGMENT_ANGULAR_DAMPING,
            );

            let axis = Vec3::new(
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
                self.rng.gen_range(-1.0..1.0),
            )
            .normalize_or(Vec3::Y);

            // Fragments live at the scene root: independent entities with no
            // parent, free to move on their own.
            let visual = world.spawn((
                Transform {
                    position,
                    rotation,
                    scale: Vec3::ONE,
                },
                MeshInstance::new(i as u32, 1),
                BodyRef {
                    handle: body,
                    mass: debris_mass,
                },
                FragmentSpin { axis },
            ));

            fragments.push(Fragment {
                visual,
                body,
                mass: debris_mass,
            });
        }

        log::info!(
            "'{}' shattered into {} fragments",
            building.kind.name,
            fragments.len()
        );
        building.fragments = fragments;
        building.state = BuildingState::Damaged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authored_models;
    use crate::buildings::{BuildingKind, SlotId};
    use glam::Quat;
    use hecs::Entity;

    fn test_building(world: &mut World, physics: &mut PhysicsWorld, origin: Transform) -> Building {
        let visual = world.spawn((origin, MeshInstance::new(0, 0)));
        let body = physics.add_static_box(origin.position, origin.rotation, Vec3::splat(2.0));
        Building {
            state: BuildingState::Intact,
            kind: BuildingKind {
                name: "tower".into(),
                intact_model: "tower/intact".into(),
                broken_model: "tower/broken".into(),
                debris_mass: None,
            },
            visual,
            body: Some(body),
            fragments: Vec::new(),
            slot: SlotId(0),
            origin,
        }
    }

    #[test]
    fn shatter_twice_produces_one_fragment_set() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut building =
            test_building(&mut world, &mut physics, Transform::from_position(Vec3::ZERO));
        let broken = authored_models::broken_building(Vec3::new(4.0, 8.0, 4.0), [2, 2, 2]);
        let mut pipeline = DestructionPipeline::with_seed(7);
        let defaults = SpawnOptions::default();

        pipeline.shatter(&mut building, &broken, 4.0, &defaults, &mut world, &mut physics);
        assert_eq!(building.state, BuildingState::Damaged);
        assert_eq!(building.fragments.len(), 8);
        assert_eq!(physics.body_count(), 8);

        pipeline.shatter(&mut building, &broken, 4.0, &defaults, &mut world, &mut physics);
        assert_eq!(building.fragments.len(), 8);
        assert_eq!(physics.body_count(), 8);
    }

    #[test]
    fn fragment_bodies_sit_on_piece_world_centers() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let origin = Transform::from_position_rotation(
            Vec3::new(12.0, 0.0, -7.0),
            Quat::from_rotation_y(0.8),
        );
        let mut building = test_building(&mut world, &mut physics, origin);
        let broken = authored_models::broken_building(Vec3::new(4.0, 8.0, 4.0), [2, 2, 2]);
        let mut pipeline = DestructionPipeline::with_seed(8);

        pipeline.shatter(
            &mut building,
            &broken,
            4.0,
            &SpawnOptions::default(),
            &mut world,
            &mut physics,
        );

        for (fragment, piece) in building.fragments.iter().zip(&broken.pieces) {
            let expected = origin.transform_point(piece.center) + Vec3::Y * GROUND_CLEARANCE;
            let actual = physics.get_body_transform(fragment.body).unwrap().position;
            assert!(
                (actual - expected).length() < 1e-4,
                "fragment body at {:?}, expected {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn shatter_removes_intact_visual_and_body() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut building =
            test_building(&mut world, &mut physics, Transform::from_position(Vec3::ZERO));
        let intact_visual: Entity = building.visual;
        let broken = authored_models::broken_building(Vec3::new(2.0, 2.0, 2.0), [1, 2, 1]);
        let mut pipeline = DestructionPipeline::with_seed(9);

        pipeline.shatter(
            &mut building,
            &broken,
            4.0,
            &SpawnOptions::default(),
            &mut world,
            &mut physics,
        );

        assert!(building.body.is_none());
        assert!(!world.contains(intact_visual));
        // Only the fragment visuals remain.
        assert_eq!(world.len() as usize, building.fragments.len());
    }

    #[test]
    fn fragment_mass_matches_debris_mass() {
        let mut world = World::new();
        let mut physics = PhysicsWorld::new();
        let mut building =
            test_building(&mut world, &mut physics, Transform::from_position(Vec3::ZERO));
        let broken = authored_models::broken_building(Vec3::new(2.0, 4.0, 2.0), [1, 2, 1]);
        let mut pipeline = DestructionPipeline::with_seed(10);

        pipeline.shatter(
            &mut building,
            &broken,
            6.5,
            &SpawnOptions::default(),
            &mut world,
            &mut physics,
        );
        for fragment in &building.fragments {
            let mass = physics.body_mass(fragment.body).unwrap();
            assert!((mass - 6.5).abs() < 1e-3);
        }
    }
}
