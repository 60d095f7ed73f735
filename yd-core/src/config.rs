//! Unified configuration schema for the match engine.
//!
//! One YAML file covers both the dice simulation and the session layer, so
//! an authority process loads a single config at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Dice simulation settings.
    #[serde(default)]
    pub physics: PhysicsConfig,
    /// Session gateway settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Dice simulation configuration.
///
/// The defaults reproduce the reference table feel: strong gravity, mildly
/// bouncy contacts, dice settling within a couple of simulated seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhysicsConfig {
    /// Fixed simulation timestep in seconds.
    #[serde(default = "default_dt")]
    pub dt: f32,
    /// Gravity magnitude (pulls along -Z).
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    /// Contact restitution for floor and wall bounces.
    #[serde(default = "default_restitution")]
    pub restitution: f32,
    /// Tangential velocity fraction removed per contact.
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Per-second linear velocity decay.
    #[serde(default = "default_linear_damping")]
    pub linear_damping: f32,
    /// Per-second angular velocity decay.
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f32,
    /// Linear speed below which a die counts as still.
    #[serde(default = "default_settle_linear_speed")]
    pub settle_linear_speed: f32,
    /// Angular speed below which a die counts as still.
    #[serde(default = "default_settle_angular_speed")]
    pub settle_angular_speed: f32,
    /// Consecutive still ticks required before a die reports settled.
    #[serde(default = "default_settle_ticks")]
    pub settle_ticks: u32,
    /// Hard tick budget per roll; exceeding it forces nearest-pose
    /// resolution of any remaining dice.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
    /// Angular tolerance (radians) for classifying a rest pose as a face.
    #[serde(default = "default_face_epsilon")]
    pub face_epsilon: f32,
    /// How many times an edge-rested die is nudged awake before falling
    /// back to the nearest pose.
    #[serde(default = "default_rearm_retry_cap")]
    pub rearm_retry_cap: u32,
    /// Half extent of the square arena in X and Y.
    #[serde(default = "default_arena_half_extent")]
    pub arena_half_extent: f32,
    /// Spawn height above the floor.
    #[serde(default = "default_drop_height")]
    pub drop_height: f32,
    /// Launch speed range for thrown dice.
    #[serde(default = "default_launch_speed_min")]
    pub launch_speed_min: f32,
    #[serde(default = "default_launch_speed_max")]
    pub launch_speed_max: f32,
    /// Maximum initial spin magnitude.
    #[serde(default = "default_spin_speed_max")]
    pub spin_speed_max: f32,
}

fn default_dt() -> f32 {
    1.0 / 120.0
}
fn default_gravity() -> f32 {
    50.0
}
fn default_restitution() -> f32 {
    0.3
}
fn default_friction() -> f32 {
    0.35
}
fn default_linear_damping() -> f32 {
    0.4
}
fn default_angular_damping() -> f32 {
    0.8
}
fn default_settle_linear_speed() -> f32 {
    0.25
}
fn default_settle_angular_speed() -> f32 {
    0.4
}
fn default_settle_ticks() -> u32 {
    12
}
fn default_max_ticks() -> u32 {
    4096
}
fn default_face_epsilon() -> f32 {
    0.1
}
fn default_rearm_retry_cap() -> u32 {
    3
}
fn default_arena_half_extent() -> f32 {
    6.0
}
fn default_drop_height() -> f32 {
    4.0
}
fn default_launch_speed_min() -> f32 {
    6.0
}
fn default_launch_speed_max() -> f32 {
    11.0
}
fn default_spin_speed_max() -> f32 {
    12.0
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            gravity: default_gravity(),
            restitution: default_restitution(),
            friction: default_friction(),
            linear_damping: default_linear_damping(),
            angular_damping: default_angular_damping(),
            settle_linear_speed: default_settle_linear_speed(),
            settle_angular_speed: default_settle_angular_speed(),
            settle_ticks: default_settle_ticks(),
            max_ticks: default_max_ticks(),
            face_epsilon: default_face_epsilon(),
            rearm_retry_cap: default_rearm_retry_cap(),
            arena_half_extent: default_arena_half_extent(),
            drop_height: default_drop_height(),
            launch_speed_min: default_launch_speed_min(),
            launch_speed_max: default_launch_speed_max(),
            spin_speed_max: default_spin_speed_max(),
        }
    }
}

/// Session gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Simulation ticks granted per pump call for each in-flight roll.
    #[serde(default = "default_steps_per_pump")]
    pub steps_per_pump: u32,
    /// Base seed for per-roll RNG derivation. 0 is a valid seed; replaying
    /// the same seed and event sequence reproduces every outcome.
    #[serde(default)]
    pub roll_seed: u64,
}

fn default_steps_per_pump() -> u32 {
    256
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            steps_per_pump: default_steps_per_pump(),
            roll_seed: 0,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = Config::default();
        assert!(c.physics.dt > 0.0);
        assert!(c.physics.settle_ticks > 0);
        assert!(c.physics.max_ticks > c.physics.settle_ticks);
        assert!(c.physics.launch_speed_min <= c.physics.launch_speed_max);
        assert!(c.physics.face_epsilon > 0.0);
        assert!(c.session.steps_per_pump > 0);
    }

    #[test]
    fn partial_yaml_falls_back_to_defaults() {
        let yaml = r#"
physics:
  gravity: 30.0
  rearm_retry_cap: 5

session:
  roll_seed: 42
"#;
        let c = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(c.physics.gravity, 30.0);
        assert_eq!(c.physics.rearm_retry_cap, 5);
        // Untouched fields keep their defaults.
        assert_eq!(c.physics.restitution, default_restitution());
        assert_eq!(c.session.roll_seed, 42);
        assert_eq!(c.session.steps_per_pump, default_steps_per_pump());
    }

    #[test]
    fn test_load_local_yaml() {
        let c = Config::load("../configs/local.yaml").expect("Failed to load configs/local.yaml");
        assert_eq!(c.physics.dt, 1.0 / 120.0);
        assert_eq!(c.physics.gravity, 50.0);
        assert_eq!(c.physics.rearm_retry_cap, 3);
        assert_eq!(c.session.steps_per_pump, 256);
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        assert!(Config::from_yaml(invalid_yaml).is_err());
    }
}
