//! The tornado field: drift, formation, and the analytic force model.

use crate::particle::ParticlePool;
use glam::Vec3;

/// Force and torque the field exerts on a body at a sampled position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldSample {
    pub force: Vec3,
    pub torque: Vec3,
}

impl FieldSample {
    pub const ZERO: Self = Self {
        force: Vec3::ZERO,
        torque: Vec3::ZERO,
    };
}

/// Tunable parameters for a [`TornadoField`].
#[derive(Debug, Clone, Copy)]
pub struct FieldParams {
    pub max_radius: f32,
    pub max_height: f32,
    pub core_radius: f32,
    pub force_strength: f32,
    pub particle_count: usize,
    /// Seconds from spawn until the funnel is fully coalesced.
    pub formation_duration: f32,
    /// Ground-plane drift velocity.
    pub velocity: Vec3,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            max_radius: 30.0,
            max_height: 40.0,
            core_radius: 2.0,
            force_strength: 150_000.0,
            particle_count: 800,
            formation_duration: 8.0,
            velocity: Vec3::ZERO,
        }
    }
}

/// The moving vortex. Owns its visual particle pool; the force model in
/// [`force_at`](TornadoField::force_at) is independent of the particles.
pub struct TornadoField {
    position: Vec3,
    velocity: Vec3,
    max_height: f32,
    max_radius: f32,
    core_radius: f32,
    force_strength: f32,
    time: f32,
    formation_time: f32,
    formation_duration: f32,
    pool: ParticlePool,
}

/// Inner dead zone: queries closer than this to the axis get a zero sample,
/// avoiding a degenerate pull direction at the center.
const DEAD_ZONE: f32 = 0.1;

/// Lift coefficient, deliberately independent of `force_strength` so bodies
/// can still be lofted at low field strengths.
const LIFT_STRENGTH: f32 = 200.0;

impl TornadoField {
    pub fn new(position: Vec3, params: FieldParams) -> Self {
        Self {
            position,
            velocity: params.velocity,
            max_height: params.max_height,
            max_radius: params.max_radius,
            core_radius: params.core_radius,
            force_strength: params.force_strength,
            time: 0.0,
            formation_time: 0.0,
            formation_duration: params.formation_duration.max(f32::EPSILON),
            pool: ParticlePool::new(params.particle_count, params.max_height),
        }
    }

    /// Advance clocks, drift the field, and step the particle pool.
    pub fn update(&mut self, dt: f32) {
        self.time += dt;
        self.formation_time += dt;
        self.position += self.velocity * dt;
        let chaos = self.chaos_factor();
        self.pool.update(
            dt,
            self.position,
            self.time,
            self.max_height,
            self.max_radius,
            self.core_radius,
            chaos,
        );
    }

    /// Formation chaos weight: 1 at spawn, decaying to 0 once coalesced.
    pub fn chaos_factor(&self) -> f32 {
        1.0 - (self.formation_time / self.formation_duration).clamp(0.0, 1.0)
    }

    /// Sample the force and torque on a body of `mass` at `position`.
    ///
    /// Pure: no field state is mutated, so this can be called for every
    /// dynamic body in a frame without interference. The pull is horizontal —
    /// the field center is projected to the query's height before measuring
    /// distance.
    pub fn force_at(&self, position: Vec3, mass: f32) -> FieldSample {
        let center = Vec3::new(self.position.x, position.y, self.position.z);
        let delta = center - position;
        let distance = delta.length();

        if distance >= self.max_radius || distance <= DEAD_ZONE {
            return FieldSample::ZERO;
        }

        let mass = mass.max(1e-3);
        let dir = delta / distance;
        // Quadratic falloff concentrates the effect near the core.
        let falloff = (1.0 - distance / self.max_radius).powi(2);
        let base = self.force_strength * falloff / mass;

        let tangent = Vec3::new(-dir.z, 0.0, dir.x);
        let lift = LIFT_STRENGTH * falloff / mass;
        let force = dir * (0.7 * base) + tangent * (0.5 * base) + Vec3::Y * lift;

        // Dominant spin about Y plus small oscillating wobble about X/Z.
        // Both wobble axes are sine-phased so a fresh field (time 0) spins
        // cleanly about Y with no lateral kick.
        let torque = Vec3::new(
            (self.time * 2.0).sin() * 0.3 * base,
            1.2 * base,
            (self.time * 3.0).sin() * 0.3 * base,
        );

        FieldSample { force, torque }
    }

    /// Normalized quadratic falloff at a position: 1 at the axis, 0 at and
    /// beyond the field radius.
    pub fn falloff(&self, position: Vec3) -> f32 {
        let distance = self.planar_distance(position);
        if distance >= self.max_radius {
            0.0
        } else {
            (1.0 - distance / self.max_radius).powi(2)
        }
    }

    /// Planar (XZ) distance from the field axis to a point.
    pub fn planar_distance(&self, point: Vec3) -> f32 {
        let dx = self.position.x - point.x;
        let dz = self.position.z - point.z;
        (dx * dx + dz * dz).sqrt()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn max_radius(&self) -> f32 {
        self.max_radius
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.pool
    }

    // ── Tunables (external parameter panels) ───────────────────────────────

    pub fn set_strength(&mut self, strength: f32) {
        self.force_strength = strength;
    }

    pub fn set_max_radius(&mut self, radius: f32) {
        self.max_radius = radius.max(DEAD_ZONE);
    }

    pub fn set_max_height(&mut self, height: f32) {
        self.max_height = height.max(f32::EPSILON);
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Change the particle count. Per-particle identity has no external
    /// meaning, so this discards the whole pool and restarts formation.
    pub fn set_particle_count(&mut self, count: usize) {
        log::debug!("rebuilding particle pool: {} particles", count);
        self.pool = ParticlePool::new(count, self.max_height);
        self.time = 0.0;
        self.formation_time = 0.0;
    }
}
