//! Funnel particle pool: per-particle procedural kinematics.
//!
//! Each particle carries a fixed "personality" rolled once at spawn (orbit
//! radius factor, spin and climb speeds, phase offsets) plus fixed random
//! chaos directions that are scaled at runtime by the field's formation
//! chaos factor — the directions are never re-rolled, so the settled funnel
//! does not jitter frame to frame.

use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

/// A single funnel particle. Owned exclusively by [`ParticlePool`].
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    /// Orbit angle around the field axis (radians).
    pub angle: f32,
    /// Height above the field base, always in `[0, max_height]`.
    pub height: f32,
    /// Fraction of the local funnel radius this particle orbits at.
    pub target_radius_factor: f32,
    /// Base angular speed (rad/s) before the resonance profile.
    pub spin_speed: f32,
    /// Climb speed (units/s).
    pub upward_speed: f32,
    /// Helix phase offset.
    pub phase: f32,
    /// Shared phase for the sinusoidal turbulence layer.
    pub turbulence_offset: f32,
    /// Amplitude of the radial breathing oscillation.
    pub radial_oscillation: f32,
    /// Phase of the radial breathing oscillation.
    pub radial_phase: f32,
    /// Fixed random chaos direction, scaled by the global chaos factor.
    pub chaos_x: f32,
    pub chaos_y: f32,
    pub chaos_z: f32,
    /// World-space position computed by the last update.
    pub position: Vec3,
}

/// Pool of funnel particles. One flat array, insertion order = index.
pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: StdRng,
}

/// Funnel radius at a given height: narrow near the ground, flaring
/// sub-linearly toward the top.
pub fn radius_at_height(height: f32, max_height: f32, max_radius: f32) -> f32 {
    let t = (height / max_height).clamp(0.0, 1.0);
    max_radius * (0.15 + t.powf(0.7) * 0.85)
}

impl ParticlePool {
    /// Create a pool of `count` particles scattered through the funnel.
    pub fn new(count: usize, max_height: f32) -> Self {
        Self::with_rng(count, max_height, StdRng::from_entropy())
    }

    /// Deterministic constructor for tests.
    pub fn with_seed(count: usize, max_height: f32, seed: u64) -> Self {
        Self::with_rng(count, max_height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(count: usize, max_height: f32, mut rng: StdRng) -> Self {
        let particles = (0..count).map(|_| spawn_particle(&mut rng, max_height)).collect();
        Self { particles, rng }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle data for the renderer.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle by `dt`.
    ///
    /// `center` is the field's base position, `time` its running clock and
    /// `chaos` the formation chaos factor in `[0, 1]` (1 at spawn, decaying
    /// to 0 once the funnel has coalesced).
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        center: Vec3,
        time: f32,
        max_height: f32,
        max_radius: f32,
        core_radius: f32,
        chaos: f32,
    ) {
        for p in &mut self.particles {
            p.height += p.upward_speed * dt;

            // Recycle: the stream is infinite, particles restart at the base.
            if p.height > max_height {
                p.height = 0.0;
                p.angle = self.rng.gen::<f32>() * TAU;
                p.phase = self.rng.gen::<f32>() * TAU;
                p.radial_phase = self.rng.gen::<f32>() * TAU;
            }

            let local_radius = radius_at_height(p.height, max_height, max_radius);
            let breathing =
                0.1 * (time * 2.0 + p.radial_phase).sin() * p.radial_oscillation;
            let target_radius =
                (local_radius * (p.target_radius_factor + breathing)).max(core_radius);

            // Angular speed peaks in a resonance band near 80% of the local
            // funnel radius; particles well inside or outside spin slower.
            let radius_norm = target_radius / local_radius;
            let resonance = (-(9.0 * (radius_norm - 0.8)).powi(2)).exp();
            let angular_vel = p.spin_speed * (0.3 + 2.0 * resonance);
            p.angle += angular_vel * dt;

            // Turbulence: continuous sinusoidal drift, phase-locked per particle.
            let turb_x = (time * 3.0 + p.turbulence_offset).sin() * 0.5;
            let turb_z = (time * 2.3 + p.turbulence_offset).cos() * 0.5;

            // Chaos: dominates during formation, fades to nothing once formed.
            let chaos_amp = 2.0 * chaos;
            let cx = p.chaos_x * chaos_amp;
            let cy = p.chaos_y * chaos_amp * 0.5;
            let cz = p.chaos_z * chaos_amp;

            let helix = 0.5 * (p.angle * 10.0 + p.phase).sin();

            p.position = Vec3::new(
                center.x + p.angle.cos() * target_radius + turb_x + cx,
                center.y + p.height + helix + cy,
                center.z + p.angle.sin() * target_radius + turb_z + cz,
            );
        }
    }
}

fn spawn_particle(rng: &mut StdRng, max_height: f32) -> Particle {
    Particle {
        angle: rng.gen::<f32>() * TAU,
        height: rng.gen::<f32>() * max_height,
        target_radius_factor: rng.gen_range(0.3..1.0),
        spin_speed: rng.gen_range(1.5..3.5),
        upward_speed: rng.gen_range(2.0..6.0),
        phase: rng.gen::<f32>() * TAU,
        turbulence_offset: rng.gen::<f32>() * TAU,
        radial_oscillation: rng.gen::<f32>(),
        radial_phase: rng.gen::<f32>() * TAU,
        chaos_x: rng.gen_range(-1.0..1.0),
        chaos_y: rng.gen_range(-1.0..1.0),
        chaos_z: rng.gen_range(-1.0..1.0),
        position: Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_HEIGHT: f32 = 40.0;
    const MAX_RADIUS: f32 = 30.0;

    fn step(pool: &mut ParticlePool, dt: f32, time: f32) {
        pool.update(dt, Vec3::ZERO, time, MAX_HEIGHT, MAX_RADIUS, 1.0, 0.0);
    }

    #[test]
    fn pool_has_requested_count() {
        let pool = ParticlePool::with_seed(128, MAX_HEIGHT, 7);
        assert_eq!(pool.len(), 128);
    }

    #[test]
    fn height_invariant_holds_under_arbitrary_dt() {
        let mut pool = ParticlePool::with_seed(64, MAX_HEIGHT, 42);
        let mut rng = StdRng::seed_from_u64(1);
        let mut time = 0.0;
        for _ in 0..500 {
            // Mix of zero, tiny, typical, and pathological frame times.
            let dt = match rng.gen_range(0..4) {
                0 => 0.0,
                1 => rng.gen_range(0.0..0.016),
                2 => rng.gen_range(0.016..0.1),
                _ => rng.gen_range(1.0..20.0),
            };
            time += dt;
            step(&mut pool, dt, time);
            for p in pool.particles() {
                assert!(
                    p.height >= 0.0 && p.height <= MAX_HEIGHT,
                    "height {} escaped [0, {}]",
                    p.height,
                    MAX_HEIGHT
                );
            }
        }
    }

    #[test]
    fn recycle_resets_height_to_base() {
        let mut pool = ParticlePool::with_seed(32, MAX_HEIGHT, 3);
        // A dt larger than max_height / min_upward_speed recycles everything.
        step(&mut pool, 30.0, 30.0);
        for p in pool.particles() {
            assert_eq!(p.height, 0.0);
        }
    }

    #[test]
    fn zero_dt_does_not_move_height() {
        let mut pool = ParticlePool::with_seed(16, MAX_HEIGHT, 9);
        let before: Vec<f32> = pool.particles().iter().map(|p| p.height).collect();
        step(&mut pool, 0.0, 0.0);
        let after: Vec<f32> = pool.particles().iter().map(|p| p.height).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn radius_profile_is_narrow_at_base_wide_at_top() {
        let base = radius_at_height(0.0, MAX_HEIGHT, MAX_RADIUS);
        let top = radius_at_height(MAX_HEIGHT, MAX_HEIGHT, MAX_RADIUS);
        assert!((base - MAX_RADIUS * 0.15).abs() < 1e-4);
        assert!((top - MAX_RADIUS).abs() < 1e-4);
        // Sub-linear growth: the midpoint radius exceeds the linear blend.
        let mid = radius_at_height(MAX_HEIGHT * 0.5, MAX_HEIGHT, MAX_RADIUS);
        let linear = MAX_RADIUS * (0.15 + 0.5 * 0.85);
        assert!(mid > linear);
    }

    #[test]
    fn chaos_offsets_positions_during_formation() {
        let mut chaotic = ParticlePool::with_seed(32, MAX_HEIGHT, 5);
        let mut settled = ParticlePool::with_seed(32, MAX_HEIGHT, 5);
        chaotic.update(0.016, Vec3::ZERO, 0.016, MAX_HEIGHT, MAX_RADIUS, 1.0, 1.0);
        settled.update(0.016, Vec3::ZERO, 0.016, MAX_HEIGHT, MAX_RADIUS, 1.0, 0.0);
        let diverged = chaotic
            .particles()
            .iter()
            .zip(settled.particles())
            .any(|(a, b)| a.position.distance(b.position) > 1e-3);
        assert!(diverged);
    }
}
