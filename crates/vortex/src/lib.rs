//! Tornado simulation: particle kinematics and the analytic force field.
//!
//! Two halves: [`ParticlePool`] drives the purely visual funnel of particles
//! (cheap closed-form kinematics, no physics bodies), while [`TornadoField`]
//! exposes the analytic force/torque function every affected rigid body
//! samples each frame. The force model is independent of the particles; the
//! pool exists only so the funnel has something to render.

pub mod field;
pub mod particle;

pub use field::*;
pub use particle::*;
