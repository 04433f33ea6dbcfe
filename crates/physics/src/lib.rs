//! Physics system using Rapier3D for Twister.
//!
//! The simulation core never integrates bodies itself: everything physical
//! goes through [`PhysicsWorld`], which owns the Rapier sets and pipelines.

pub mod physics_world;

pub use physics_world::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
