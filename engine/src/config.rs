//! Engine Configuration
//!
//! Tunables for the physics step and the player entity. `Default` returns the
//! values the game ships with; every struct is `serde(default)` so a JSON file
//! only needs to name the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::GridAxes;

/// Failure while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rigidbody integration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (blocks/s²)
    pub gravity: f32,
    /// Maximum falling speed (blocks/s, positive)
    pub terminal_velocity: f32,
    /// Fraction of horizontal control kept while airborne
    pub air_control: f32,
    /// Longest single sweep sub-step (blocks). Must stay below 1.0 so a
    /// sub-step can never skip over a whole cell.
    pub max_substep: f32,
    /// Distance the grounded probe reaches below the feet
    pub ground_probe: f32,
    /// Gap left between a body and the face it was stopped against
    pub skin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 20.0,
            terminal_velocity: 50.0,
            air_control: 0.15,
            max_substep: 0.45,
            ground_probe: 0.01,
            skin: 0.001,
        }
    }
}

/// Player entity tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    /// Ground speed without sprint (blocks/s)
    pub walking_speed: f32,
    /// Ground speed with sprint held (blocks/s)
    pub running_speed: f32,
    /// Degrees of rotation per unit of mouse delta per second
    pub mouse_sensitivity: f32,
    /// Block interaction reach (blocks)
    pub reach: f32,
    /// Upward impulse applied on jump
    pub jump_impulse: f32,
    /// Pitch clamp (degrees, symmetric)
    pub pitch_limit: f32,
    /// Camera offset above the body origin
    pub camera_height: f32,
    /// Vertical field of view (degrees)
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    /// Body half-width on X and Z
    pub half_width: f32,
    /// Body height from the feet
    pub height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            walking_speed: 6.0,
            running_speed: 12.0,
            mouse_sensitivity: 80.0,
            reach: 10.0,
            jump_impulse: 6.0,
            pitch_limit: 89.0,
            camera_height: 0.9,
            camera_fov: 45.0,
            camera_near: 0.01,
            camera_far: 1000.0,
            half_width: 0.3,
            height: 1.8,
        }
    }
}

/// Top-level configuration handed to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    /// Axis convention used when reading transforms in grid space
    pub grid_axes: GridAxes,
}

impl EngineConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        log::debug!("loaded engine config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_values() {
        let config = EngineConfig::default();
        assert_eq!(config.player.walking_speed, 6.0);
        assert_eq!(config.player.running_speed, 12.0);
        assert_eq!(config.player.mouse_sensitivity, 80.0);
        assert_eq!(config.player.reach, 10.0);
        assert_eq!(config.physics.air_control, 0.15);
        assert!(config.physics.max_substep < 1.0);
        assert_eq!(config.grid_axes, GridAxes::Identity);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{ "physics": { "gravity": 9.81 }, "grid_axes": "mirror_z" }"#,
        )
        .unwrap();
        assert_eq!(config.physics.gravity, 9.81);
        assert_eq!(config.physics.air_control, 0.15);
        assert_eq!(config.player, PlayerConfig::default());
        assert_eq!(config.grid_axes, GridAxes::MirrorZ);
    }

    #[test]
    fn json_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
