//! Time management for the simulation loop.
//!
//! Two clocks: the frame clock always advances (drives rendering and input),
//! while the simulation clock advances only when the frame is ticked into the
//! simulation — pausing the game freezes `sim_elapsed` and the fixed-step
//! accumulator without stalling the frame clock.

use std::time::{Duration, Instant};

/// Manages frame timing, delta time, and the pausable simulation clock.
#[derive(Debug)]
pub struct Time {
    /// Time when the engine started.
    start_time: Instant,
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed wall time since start.
    elapsed: Duration,
    /// Total simulated time (frozen while paused).
    sim_elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
    /// Fixed timestep for physics (default 60 Hz).
    fixed_timestep: Duration,
    /// Accumulated simulation time for fixed updates.
    accumulator: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_frame: now,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            sim_elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_timestep: Duration::from_secs_f64(1.0 / 60.0),
            accumulator: Duration::ZERO,
        }
    }

    /// Update timing at the start of a new frame from the wall clock.
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_frame);
        self.last_frame = now;
        self.elapsed = now - self.start_time;
    }

    /// Advance the frame clock by an explicit delta (headless loops, tests).
    pub fn advance(&mut self, dt: Duration) {
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
    }

    /// Feed this frame's delta into the simulation clock. Skipped while
    /// paused, which freezes simulated time and the fixed-step accumulator.
    pub fn tick_sim(&mut self) {
        self.sim_elapsed += self.delta;
        self.accumulator += self.delta;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed wall time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total simulated time in seconds.
    pub fn sim_seconds(&self) -> f32 {
        self.sim_elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the fixed timestep in seconds.
    pub fn fixed_timestep_seconds(&self) -> f32 {
        self.fixed_timestep.as_secs_f32()
    }

    /// Check if a fixed update should run and consume the time.
    pub fn should_fixed_update(&mut self) -> bool {
        if self.accumulator >= self.fixed_timestep {
            self.accumulator -= self.fixed_timestep;
            true
        } else {
            false
        }
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }

    /// Set the fixed timestep rate in Hz.
    pub fn set_fixed_rate(&mut self, hz: f64) {
        self.fixed_timestep = Duration::from_secs_f64(1.0 / hz);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_clock_frozen_without_tick() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(16));
        time.advance(Duration::from_millis(16));
        assert!(time.elapsed_seconds() > 0.03);
        assert_eq!(time.sim_seconds(), 0.0);
        assert!(!time.should_fixed_update());
    }

    #[test]
    fn sim_clock_advances_with_tick() {
        let mut time = Time::new();
        for _ in 0..4 {
            time.advance(Duration::from_millis(16));
            time.tick_sim();
        }
        assert!((time.sim_seconds() - 0.064).abs() < 1e-3);
        // 64 ms accumulated at 60 Hz yields three fixed updates.
        let mut steps = 0;
        while time.should_fixed_update() {
            steps += 1;
        }
        assert_eq!(steps, 3);
    }

    #[test]
    fn frame_count_increments() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(8));
        time.advance(Duration::from_millis(8));
        assert_eq!(time.frame_count(), 2);
    }
}
