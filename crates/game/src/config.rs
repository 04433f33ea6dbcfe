//! Simulation configuration. Loaded from config.ron at startup.

use assets::SpawnOptions;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use vortex::FieldParams;

/// Persistent simulation settings. Loaded from `config.ron` in the current
/// directory (or next to the binary). Every tunable exposed to external
/// parameter panels lives here with an explicit default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Field strength (scales radial pull and orbital drive, not lift).
    #[serde(default = "default_force_strength")]
    pub force_strength: f32,
    /// Field radius in world units: no force beyond this distance.
    #[serde(default = "default_max_radius")]
    pub max_radius: f32,
    /// Funnel height in world units.
    #[serde(default = "default_max_height")]
    pub max_height: f32,
    /// Visual core radius: floor for particle orbit radii.
    #[serde(default = "default_core_radius")]
    pub core_radius: f32,
    /// Funnel particle count. Changing this rebuilds the whole pool.
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    /// Seconds from spawn until the funnel is fully coalesced.
    #[serde(default = "default_formation_duration")]
    pub formation_duration: f32,
    /// Ground-plane drift velocity (X component).
    #[serde(default = "default_drift_x")]
    pub drift_x: f32,
    /// Ground-plane drift velocity (Z component).
    #[serde(default)]
    pub drift_z: f32,
    /// Planar distance at which an intact building is damaged.
    #[serde(default = "default_damage_radius")]
    pub damage_radius: f32,
    /// Fragment mass when a building type does not override it.
    #[serde(default = "default_debris_mass")]
    pub debris_mass: f32,
    /// Default mass for spawned props.
    #[serde(default = "default_prop_mass")]
    pub prop_mass: f32,
    /// Default friction for spawned bodies.
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Default restitution for spawned bodies.
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    /// Default scale for spawned models.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

fn default_force_strength() -> f32 {
    150_000.0
}
fn default_max_radius() -> f32 {
    30.0
}
fn default_max_height() -> f32 {
    40.0
}
fn default_core_radius() -> f32 {
    2.0
}
fn default_particle_count() -> usize {
    800
}
fn default_formation_duration() -> f32 {
    8.0
}
fn default_drift_x() -> f32 {
    1.5
}
fn default_damage_radius() -> f32 {
    12.0
}
fn default_debris_mass() -> f32 {
    4.0
}
fn default_prop_mass() -> f32 {
    10.0
}
fn default_friction() -> f32 {
    0.5
}
fn default_restitution() -> f32 {
    0.2
}
fn default_scale() -> f32 {
    1.0
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            force_strength: default_force_strength(),
            max_radius: default_max_radius(),
            max_height: default_max_height(),
            core_radius: default_core_radius(),
            particle_count: default_particle_count(),
            formation_duration: default_formation_duration(),
            drift_x: default_drift_x(),
            drift_z: 0.0,
            damage_radius: default_damage_radius(),
            debris_mass: default_debris_mass(),
            prop_mass: default_prop_mass(),
            friction: default_friction(),
            restitution: default_restitution(),
            scale: default_scale(),
        }
    }
}

impl SimConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }

    /// Field parameters derived from this config.
    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            max_radius: self.max_radius,
            max_height: self.max_height,
            core_radius: self.core_radius,
            force_strength: self.force_strength,
            particle_count: self.particle_count,
            formation_duration: self.formation_duration,
            velocity: Vec3::new(self.drift_x, 0.0, self.drift_z),
        }
    }

    /// Default spawn options derived from this config.
    pub fn spawn_defaults(&self) -> SpawnOptions {
        SpawnOptions {
            mass: self.prop_mass,
            position: Vec3::ZERO,
            scale: self.scale,
            friction: self.friction,
            restitution: self.restitution,
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}
