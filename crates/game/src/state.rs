//! Simulation state: single owner of the world, physics, field, and registries.

use assets::{ModelCatalog, SpawnOptions};
use engine_core::{MeshInstance, Time, Transform, Vec3};
use glam::Quat;
use hecs::{Entity, World};
use physics::PhysicsWorld;
use vortex::TornadoField;

use crate::buildings::{BuildingId, BuildingKind, BuildingRegistry, SlotId};
use crate::config::SimConfig;
use crate::destruction::DestructionPipeline;
use crate::forces::{BodyRef, ForceApplicationBridge};

/// Default damping for loose props (crates, vehicles, dropped objects).
const PROP_LINEAR_DAMPING: f32 = 0.01;
const PROP_ANGULAR_DAMPING: f32 = 0.05;

/// Everything the simulation owns. Built once at scene start, torn down with
/// the process; all state is in-memory and rebuilt each run.
pub struct GameState {
    pub config: SimConfig,
    pub time: Time,
    pub world: World,
    pub physics: PhysicsWorld,
    pub field: TornadoField,
    pub buildings: BuildingRegistry,
    pub destruction: DestructionPipeline,
    pub bridge: ForceApplicationBridge,
    pub catalog: ModelCatalog,
    /// Skips all simulation work while the frame clock runs on.
    pub paused: bool,
}

impl GameState {
    pub fn new(config: SimConfig, catalog: ModelCatalog, field_position: Vec3) -> Self {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane();
        let field = TornadoField::new(field_position, config.field_params());
        let buildings = BuildingRegistry::new(config.damage_radius);
        Self {
            config,
            time: Time::new(),
            world: World::new(),
            physics,
            field,
            buildings,
            destruction: DestructionPipeline::new(),
            bridge: ForceApplicationBridge::new(),
            catalog,
            paused: false,
        }
    }

    /// Place a building of `kind` in a slot. Failed loads and occupied or
    /// unknown slots return `None` without side effects.
    pub fn place_building(&mut self, slot: SlotId, kind: BuildingKind) -> Option<BuildingId> {
        self.buildings.place_building(
            slot,
            kind,
            &mut self.catalog,
            &mut self.world,
            &mut self.physics,
        )
    }

    /// Demolish a building in either state, freeing its slot.
    pub fn demolish_building(&mut self, id: BuildingId) -> bool {
        self.buildings
            .demolish_building(id, &mut self.world, &mut self.physics)
    }

    /// Spawn a loose dynamic prop (crate, vehicle, player-dropped object)
    /// that the field will act on.
    pub fn spawn_prop(&mut self, half_extents: Vec3, options: SpawnOptions) -> Entity {
        let handle = self.physics.add_dynamic_box(
            options.position,
            Quat::IDENTITY,
            half_extents * options.scale,
            options.mass,
            options.friction,
            options.restitution,
            PROP_LINEAR_DAMPING,
            PROP_ANGULAR_DAMPING,
        );
        self.world.spawn((
            Transform::from_position(options.position),
            MeshInstance::new(0, 2),
            BodyRef {
                handle,
                mass: options.mass,
            },
        ))
    }

    /// Remove a prop and its body. Unknown entities are a no-op.
    pub fn remove_prop(&mut self, entity: Entity) -> bool {
        let Ok(body_ref) = self.world.get::<&BodyRef>(entity) else {
            return false;
        };
        let handle = body_ref.handle;
        drop(body_ref);
        self.physics.remove_body(handle);
        self.world.despawn(entity).is_ok()
    }

    /// Copy body poses onto the visual transforms at the end of a frame.
    pub fn sync_visuals(&mut self) {
        for (_, (transform, body_ref)) in self.world.query_mut::<(&mut Transform, &BodyRef)>() {
            if let Some(pose) = self.physics.get_body_transform(body_ref.handle) {
                transform.position = pose.position;
                transform.rotation = pose.rotation;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authored_models;
    use crate::update;
    use assets::ModelSource;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn demo_catalog() -> ModelCatalog {
        let mut catalog = ModelCatalog::new(ModelSource::new("unused"));
        let size = Vec3::new(4.0, 8.0, 4.0);
        catalog.insert("tower/intact", authored_models::intact_building(size));
        catalog.insert(
            "tower/broken",
            authored_models::broken_building(size, [2, 2, 2]),
        );
        catalog
    }

    fn tower_kind() -> BuildingKind {
        BuildingKind {
            name: "tower".into(),
            intact_model: "tower/intact".into(),
            broken_model: "tower/broken".into(),
            debris_mass: None,
        }
    }

    fn small_config() -> SimConfig {
        SimConfig {
            particle_count: 8,
            drift_x: 0.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn prop_spawn_and_remove_leave_no_bodies() {
        let mut state = GameState::new(small_config(), demo_catalog(), Vec3::new(-50.0, 0.0, 0.0));
        assert_eq!(state.physics.body_count(), 0);
        let prop = state.spawn_prop(
            Vec3::splat(0.5),
            SpawnOptions {
                position: Vec3::new(5.0, 1.0, 0.0),
                ..SpawnOptions::default()
            },
        );
        assert_eq!(state.physics.body_count(), 1);
        assert!(state.remove_prop(prop));
        assert_eq!(state.physics.body_count(), 0);
        assert!(!state.remove_prop(prop));
    }

    #[test]
    fn pause_freezes_simulation_but_not_the_frame_clock() {
        let mut state = GameState::new(small_config(), demo_catalog(), Vec3::ZERO);
        let prop = state.spawn_prop(
            Vec3::splat(0.5),
            SpawnOptions {
                position: Vec3::new(8.0, 6.0, 0.0),
                ..SpawnOptions::default()
            },
        );
        state.paused = true;
        for _ in 0..5 {
            update::frame(&mut state, FRAME);
        }
        assert_eq!(state.time.frame_count(), 5);
        assert_eq!(state.time.sim_seconds(), 0.0);
        assert_eq!(state.field.time(), 0.0);
        let body = state.world.get::<&BodyRef>(prop).unwrap().handle;
        let pose = state.physics.get_body_transform(body).unwrap();
        assert_eq!(pose.position, Vec3::new(8.0, 6.0, 0.0));
    }

    #[test]
    fn field_passing_over_building_shatters_it_once() {
        let mut state = GameState::new(small_config(), demo_catalog(), Vec3::new(3.0, 0.0, 0.0));
        let slot = state.buildings.add_slot(Vec3::ZERO, 6.0);
        let id = state.place_building(slot, tower_kind()).unwrap();

        for _ in 0..10 {
            update::frame(&mut state, FRAME);
        }
        let building = state.buildings.building(id).unwrap();
        assert_eq!(
            building.state,
            crate::buildings::BuildingState::Damaged
        );
        assert_eq!(building.fragments.len(), 8);
        assert_eq!(state.buildings.total_fragments(), 8);
    }

    #[test]
    fn visuals_follow_bodies_after_update() {
        let mut state = GameState::new(small_config(), demo_catalog(), Vec3::new(-50.0, 0.0, 0.0));
        let prop = state.spawn_prop(
            Vec3::splat(0.5),
            SpawnOptions {
                position: Vec3::new(0.0, 20.0, 0.0),
                ..SpawnOptions::default()
            },
        );
        for _ in 0..30 {
            update::frame(&mut state, FRAME);
        }
        let transform = *state.world.get::<&Transform>(prop).unwrap();
        assert!(transform.position.y < 20.0, "falling body should drag its visual down");
    }
}
