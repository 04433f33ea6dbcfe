//! Building slots and the Intact → Damaged state machine.
//!
//! All slot/building bookkeeping lives in owned maps inside
//! [`BuildingRegistry`]; every physics-body addition or removal for buildings
//! and their fragments funnels through here so the body set and the
//! bookkeeping can never drift apart.

use assets::ModelCatalog;
use engine_core::{MeshInstance, Transform};
use glam::Vec3;
use hecs::{Entity, World};
use physics::{PhysicsWorld, RigidBodyHandle};
use std::collections::HashMap;
use vortex::TornadoField;

use crate::config::SimConfig;
use crate::destruction::DestructionPipeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildingId(pub u32);

/// A fixed placement location that may hold at most one building.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    pub position: Vec3,
    pub size: f32,
    pub building: Option<BuildingId>,
}

impl Slot {
    pub fn occupied(&self) -> bool {
        self.building.is_some()
    }
}

/// Recipe for a placeable building type.
#[derive(Debug, Clone)]
pub struct BuildingKind {
    pub name: String,
    /// Catalog name of the intact model.
    pub intact_model: String,
    /// Catalog name of the pre-authored broken variant.
    pub broken_model: String,
    /// Per-type fragment mass; falls back to the config default.
    pub debris_mass: Option<f32>,
}

/// Directional state machine: Intact → Damaged only, no repair path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingState {
    Intact,
    Damaged,
}

/// One independently-movable piece produced by destruction.
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub visual: Entity,
    pub body: RigidBodyHandle,
    pub mass: f32,
}

/// A placed building. `fragments` is non-empty iff `state == Damaged`.
pub struct Building {
    pub state: BuildingState,
    pub kind: BuildingKind,
    pub visual: Entity,
    /// Static body of the intact representation; `None` once shattered.
    pub body: Option<RigidBodyHandle>,
    pub fragments: Vec<Fragment>,
    pub slot: SlotId,
    pub origin: Transform,
}

/// Owns every slot and building. Operations addressed to unknown ids are
/// no-ops, never errors.
pub struct BuildingRegistry {
    slots: HashMap<SlotId, Slot>,
    buildings: HashMap<BuildingId, Building>,
    next_slot: u32,
    next_building: u32,
    damage_radius: f32,
}

impl BuildingRegistry {
    pub fn new(damage_radius: f32) -> Self {
        Self {
            slots: HashMap::new(),
            buildings: HashMap::new(),
            next_slot: 0,
            next_building: 0,
            damage_radius,
        }
    }

    pub fn add_slot(&mut self, position: Vec3, size: f32) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.slots.insert(
            id,
            Slot {
                position,
                size,
                building: None,
            },
        );
        id
    }

    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &Building)> {
        self.buildings.iter().map(|(id, b)| (*id, b))
    }

    pub fn damaged_count(&self) -> usize {
        self.buildings
            .values()
            .filter(|b| b.state == BuildingState::Damaged)
            .count()
    }

    pub fn total_fragments(&self) -> usize {
        self.buildings.values().map(|b| b.fragments.len()).sum()
    }

    pub fn set_damage_radius(&mut self, radius: f32) {
        self.damage_radius = radius;
    }

    /// Place a building of `kind` in a free slot. Returns `None` without
    /// side effects for unknown slots, occupied slots, or a failed model
    /// load (logged, never fatal).
    pub fn place_building(
        &mut self,
        slot_id: SlotId,
        kind: BuildingKind,
        catalog: &mut ModelCatalog,
        world: &mut World,
        physics: &mut PhysicsWorld,
    ) -> Option<BuildingId> {
        let slot = self.slots.get(&slot_id)?;
        if slot.occupied() {
            log::debug!("slot {:?} already occupied", slot_id);
            return None;
        }
        let position = slot.position;

        let model = match catalog.get_or_load(&kind.intact_model) {
            Ok(m) => m,
            Err(e) => {
                log::warn!(
                    "placement of '{}' aborted, model '{}' failed to load: {}",
                    kind.name,
                    kind.intact_model,
                    e
                );
                return None;
            }
        };
        let (bounds_center, bounds_half) = model.bounds();

        let origin = Transform::from_position(position);
        let visual = world.spawn((origin, MeshInstance::new(0, 0)));
        let body = physics.add_static_box(
            origin.transform_point(bounds_center),
            origin.rotation,
            bounds_half,
        );

        let id = BuildingId(self.next_building);
        self.next_building += 1;
        log::info!("placed '{}' as {:?} in {:?}", kind.name, id, slot_id);
        self.buildings.insert(
            id,
            Building {
                state: BuildingState::Intact,
                kind,
                visual,
                body: Some(body),
                fragments: Vec::new(),
                slot: slot_id,
                origin,
            },
        );
        if let Some(slot) = self.slots.get_mut(&slot_id) {
            slot.building = Some(id);
        }
        Some(id)
    }

    /// Explicitly remove a building in either state: deletes the intact body
    /// or every fragment body plus visuals, and frees the slot. Orthogonal to
    /// the damage transition. Unknown ids are a no-op.
    pub fn demolish_building(
        &mut self,
        id: BuildingId,
        world: &mut World,
        physics: &mut PhysicsWorld,
    ) -> bool {
        let Some(building) = self.buildings.remove(&id) else {
            return false;
        };
        match building.state {
            BuildingState::Intact => {
                if let Some(body) = building.body {
                    physics.remove_body(body);
                }
                world.despawn(building.visual).ok();
            }
            BuildingState::Damaged => {
                for fragment in &building.fragments {
                    physics.remove_body(fragment.body);
                    world.despawn(fragment.visual).ok();
                }
            }
        }
        if let Some(slot) = self.slots.get_mut(&building.slot) {
            slot.building = None;
        }
        log::info!("demolished {:?} ('{}')", id, building.kind.name);
        true
    }

    /// Per-frame proximity scan: every intact building whose planar distance
    /// to the field axis falls below the damage radius is shattered. O(n) in
    /// buildings, which stay few relative to particles.
    pub fn damage_scan(
        &mut self,
        field: &TornadoField,
        catalog: &mut ModelCatalog,
        pipeline: &mut DestructionPipeline,
        world: &mut World,
        physics: &mut PhysicsWorld,
        config: &SimConfig,
    ) {
        let in_range: Vec<BuildingId> = self
            .buildings
            .iter()
            .filter(|(_, b)| {
                b.state == BuildingState::Intact
                    && field.planar_distance(b.origin.position) < self.damage_radius
            })
            .map(|(id, _)| *id)
            .collect();

        for id in in_range {
            let Some(building) = self.buildings.get_mut(&id) else {
                continue;
            };
            let broken = match catalog.get_or_load(&building.kind.broken_model) {
                Ok(m) => m,
                Err(e) => {
                    // Non-fatal: the building stays intact and visible.
                    log::warn!(
                        "damage transition for {:?} aborted, broken model '{}' failed: {}",
                        id,
                        building.kind.broken_model,
                        e
                    );
                    continue;
                }
            };
            let mass = building.kind.debris_mass.unwrap_or(config.debris_mass);
            pipeline.shatter(
                building,
                broken,
                mass,
                &config.spawn_defaults(),
                world,
                physics,
            );
        }
    }
}
