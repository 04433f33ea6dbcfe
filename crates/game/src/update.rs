//! Per-frame simulation advancement.
//!
//! The frame order is fixed and must not be rearranged: physics integrates
//! the previous frame's forces before new field samples are taken, and the
//! damage scan runs on settled positions.

use std::time::Duration;

use crate::state::GameState;

/// Advance one frame with an explicit delta.
///
/// Input/camera handling and rendering belong to the host. This covers, in
/// order: fixed physics sub-steps for the frame's elapsed time, field force
/// application for every dynamic body, the building proximity scan plus
/// fragment chaos torque, the particle pool advance, and syncing visual
/// transforms from their bodies. While paused the whole sequence is skipped
/// and simulated time stays frozen.
pub fn frame(state: &mut GameState, dt: Duration) {
    state.time.advance(dt);
    if state.paused {
        return;
    }
    state.time.tick_sim();

    // Integrate accumulated time in fixed sub-steps.
    while state.time.should_fixed_update() {
        state.physics.step();
    }

    // Field forces: the previous step's positions are settled, the next
    // step will integrate what gets applied here.
    state
        .bridge
        .apply(&state.world, &state.field, &mut state.physics);

    // Proximity damage scan, then chaotic torque on airborne fragments.
    state.buildings.damage_scan(
        &state.field,
        &mut state.catalog,
        &mut state.destruction,
        &mut state.world,
        &mut state.physics,
        &state.config,
    );
    state
        .bridge
        .spin_fragments(&state.world, &state.field, &mut state.physics);

    // Advance the funnel particles.
    state.field.update(state.time.delta_seconds());

    // Visuals follow their bodies.
    state.sync_visuals();
}
