//! Twister — tornado sandbox core: vortex force field + procedural destruction.
//!
//! Headless demo binary: builds a small scene (ground plane, a ring of
//! building slots, loose props), lets the field drift through it for a fixed
//! number of frames, and logs what happens. Rendering, input, and UI are
//! host concerns and deliberately absent.

mod authored_models;
mod buildings;
mod config;
mod destruction;
mod forces;
mod state;
mod update;

use anyhow::Result;
use assets::{ModelCatalog, ModelSource, SpawnOptions};
use glam::Vec3;
use rand::prelude::*;
use std::time::Duration;

use crate::buildings::BuildingKind;
use crate::config::SimConfig;
use crate::state::GameState;

/// 30 simulated seconds at 60 Hz.
const DEMO_FRAMES: u32 = 1800;
const FRAME_DT: Duration = Duration::from_micros(16_667);

fn main() -> Result<()> {
    env_logger::init();
    let config = SimConfig::load();

    // Authored placeholder models; a production install would point the
    // source at a models/ directory of glTF pairs instead.
    let mut catalog = ModelCatalog::new(ModelSource::new("models"));
    let tower_size = Vec3::new(4.0, 10.0, 4.0);
    catalog.insert("tower/intact", authored_models::intact_building(tower_size));
    catalog.insert(
        "tower/broken",
        authored_models::broken_building(tower_size, [2, 4, 2]),
    );

    // The field spawns west of the ring and drifts through it.
    let mut state = GameState::new(config, catalog, Vec3::new(-40.0, 0.0, 0.0));

    // Ring of building slots around the origin.
    for i in 0..6 {
        let angle = i as f32 / 6.0 * std::f32::consts::TAU;
        let slot = state
            .buildings
            .add_slot(Vec3::new(angle.cos() * 18.0, 0.0, angle.sin() * 18.0), 6.0);
        state.place_building(
            slot,
            BuildingKind {
                name: format!("tower_{i}"),
                intact_model: "tower/intact".into(),
                broken_model: "tower/broken".into(),
                debris_mass: None,
            },
        );
    }

    // Loose props of varying mass for the field to toss around.
    let mut rng = StdRng::seed_from_u64(0x70);
    for _ in 0..12 {
        let position = Vec3::new(
            rng.gen_range(-25.0..25.0),
            rng.gen_range(0.5..2.0),
            rng.gen_range(-25.0..25.0),
        );
        state.spawn_prop(
            Vec3::splat(rng.gen_range(0.3..0.8)),
            SpawnOptions {
                mass: rng.gen_range(2.0..40.0),
                position,
                ..state.config.spawn_defaults()
            },
        );
    }

    log::info!(
        "scene ready: {} bodies, field at {:?}",
        state.physics.body_count(),
        state.field.position()
    );

    for frame_idx in 0..DEMO_FRAMES {
        update::frame(&mut state, FRAME_DT);
        if frame_idx % 120 == 0 {
            log::info!(
                "t={:5.1}s field={:?} damaged={} fragments={} bodies={}",
                state.time.sim_seconds(),
                state.field.position(),
                state.buildings.damaged_count(),
                state.buildings.total_fragments(),
                state.physics.body_count(),
            );
        }
    }

    log::info!(
        "demo complete: {}/{} buildings damaged, {} fragments in play",
        state.buildings.damaged_count(),
        state.buildings.buildings().count(),
        state.buildings.total_fragments(),
    );
    Ok(())
}
