//! Game configuration

use actor_engine::config::Config;
use serde::{Deserialize, Serialize};

/// Game configuration, loaded from `asteroids.toml` when present
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Headless run settings
    pub run: RunConfig,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Starting lives
    pub starting_lives: u32,

    /// Large asteroids in the first wave
    pub asteroid_count: u32,

    /// Waves to clear before the game ends
    pub waves: u32,

    /// Asteroid speed range in pixels per second
    pub asteroid_speed: [f32; 2],

    /// Seconds per quarter turn of the ship autopilot
    pub ship_turn_time: f32,

    /// Bullet speed in pixels per second
    pub bullet_speed: f32,

    /// Bullet lifetime (seconds)
    pub bullet_lifetime: f32,

    /// Seconds between shots
    pub fire_interval: f32,

    /// Seconds of invulnerability after a hit
    pub invulnerability_time: f32,
}

/// Headless run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Fixed frame delta in seconds
    pub timestep: f32,

    /// Frames to simulate
    pub max_frames: u64,

    /// Seconds between status log lines
    pub report_interval: f32,

    /// Random seed for asteroid placement
    pub seed: u64,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            asteroid_count: 5,
            waves: 3,
            asteroid_speed: [30.0, 90.0],
            ship_turn_time: 1.5,
            bullet_speed: 600.0,
            bullet_lifetime: 1.2,
            fire_interval: 0.25,
            invulnerability_time: 2.0,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            max_frames: 60 * 60,
            report_interval: 5.0,
            seed: 7,
        }
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = "[gameplay]\nwaves = 1\n\n[run]\nseed = 42\n";
        let config = GameConfig::load_from_str("asteroids.toml", text).unwrap();
        assert_eq!(config.gameplay.waves, 1);
        assert_eq!(config.run.seed, 42);
        assert_eq!(config.gameplay.starting_lives, 3);
    }
}
