//! Gameplay configuration
//!
//! Only numeric parameters that affect the simulation live here. Glyphs,
//! colors and presets belong to the presentation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Player control scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// Rotate with left/right, thrust along heading with up
    #[default]
    Retro,
    /// Four-directional velocity nudging
    Directional,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::Retro => "Retro",
            ControlMode::Directional => "Directional",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "retro" => Some(ControlMode::Retro),
            "directional" | "wasd" => Some(ControlMode::Directional),
            _ => None,
        }
    }

    /// The other scheme
    pub fn toggled(&self) -> Self {
        match self {
            ControlMode::Retro => ControlMode::Directional,
            ControlMode::Directional => ControlMode::Retro,
        }
    }
}

/// Rejected configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max_large_obstacles ({max}) must be at least min_large_obstacles ({min})")]
    ObstacleBounds { min: u32, max: u32 },
    #[error("rotation rate range [{min}, {max}) is empty")]
    RotationRange { min: f32, max: f32 },
    #[error("{field} must be positive and finite")]
    NonPositive { field: &'static str },
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
    #[error("invalid configuration bundle: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Entity footprint sizes (full glyph extent in arena units)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FootprintSizes {
    pub player: f32,
    pub projectile: f32,
    pub large_enemy: f32,
    pub small_enemy: f32,
    pub large_obstacle: f32,
    pub medium_obstacle: f32,
    pub small_obstacle: f32,
    pub player_debris: f32,
    pub ellipse_debris: f32,
}

impl Default for FootprintSizes {
    fn default() -> Self {
        Self {
            player: 34.0,
            projectile: 16.0,
            large_enemy: 64.0,
            small_enemy: 40.0,
            large_obstacle: 72.0,
            medium_obstacle: 48.0,
            small_obstacle: 28.0,
            player_debris: 14.0,
            ellipse_debris: 4.0,
        }
    }
}

/// Resolved gameplay parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub control_mode: ControlMode,

    // === Level composition ===
    pub min_large_obstacles: u32,
    pub max_large_obstacles: u32,
    /// Live enemies allowed at once
    pub max_live_enemies: usize,
    /// A large obstacle spawns when a draw from [0, odds) hits odds - 1
    pub obstacle_spawn_odds: u32,
    pub enemy_spawn_odds: u32,
    /// Obstacles destroyed before small enemies may appear
    pub small_enemy_threshold: u32,
    /// Obstacles destroyed after which no more enemies spawn
    pub enemy_spawn_cutoff: u32,
    pub min_rotation_rate: f32,
    pub max_rotation_rate: f32,

    // === Player ===
    pub starting_lives: u32,
    pub projectile_limit: usize,
    pub warp_interval: u32,
    pub acceleration_limit: f32,
    pub acceleration_increment: f32,
    pub deceleration_increment: f32,
    pub directional_increment: f32,
    /// Degrees per tick
    pub rotation_increment: f32,

    // === Enemies ===
    pub direction_interval: u32,
    pub fire_interval: u32,

    // === Projectiles & debris ===
    pub projectile_velocity: f32,
    pub projectile_dissipation: u32,
    pub player_debris_amount: u32,
    pub player_debris_stagger: u32,
    pub ellipse_debris_amount: u32,
    pub ellipse_debris_dissipation: u32,

    // === Session ===
    pub max_name_length: usize,
    /// Seconds between losing the last life and name entry
    pub game_over_delay: f32,
    /// Seconds the level number stays on screen
    pub level_banner_delay: f32,
    pub lives_glyph: String,

    pub footprints: FootprintSizes,
}

impl Default for GameConfig {
    fn default() -> Self {
        let max_large_obstacles = 4;
        Self {
            control_mode: ControlMode::Retro,

            min_large_obstacles: 2,
            max_large_obstacles,
            max_live_enemies: 3,
            obstacle_spawn_odds: 100,
            enemy_spawn_odds: 256,
            small_enemy_threshold: (max_large_obstacles / 2) * 7,
            enemy_spawn_cutoff: max_large_obstacles * 7,
            min_rotation_rate: 1.0,
            max_rotation_rate: 3.0,

            starting_lives: 3,
            projectile_limit: 4,
            warp_interval: 80,
            acceleration_limit: 2.0,
            acceleration_increment: 0.0002,
            deceleration_increment: 0.0001,
            directional_increment: 0.05,
            rotation_increment: 2.0,

            direction_interval: 256,
            fire_interval: 96,

            projectile_velocity: 5.0,
            projectile_dissipation: 100,
            player_debris_amount: 6,
            player_debris_stagger: 32,
            ellipse_debris_amount: 6,
            ellipse_debris_dissipation: 100,

            max_name_length: 4,
            game_over_delay: 2.0,
            level_banner_delay: 2.0,
            lives_glyph: "▲".to_string(),

            footprints: FootprintSizes::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration bundle
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_large_obstacles < self.min_large_obstacles {
            return Err(ConfigError::ObstacleBounds {
                min: self.min_large_obstacles,
                max: self.max_large_obstacles,
            });
        }
        let rates_finite = self.min_rotation_rate.is_finite() && self.max_rotation_rate.is_finite();
        if !rates_finite || self.min_rotation_rate >= self.max_rotation_rate {
            return Err(ConfigError::RotationRange {
                min: self.min_rotation_rate,
                max: self.max_rotation_rate,
            });
        }

        let positive = [
            ("acceleration_limit", self.acceleration_limit),
            ("projectile_velocity", self.projectile_velocity),
            ("directional_increment", self.directional_increment),
            ("footprints.player", self.footprints.player),
            ("footprints.large_obstacle", self.footprints.large_obstacle),
            ("footprints.medium_obstacle", self.footprints.medium_obstacle),
            ("footprints.small_obstacle", self.footprints.small_obstacle),
            ("footprints.large_enemy", self.footprints.large_enemy),
            ("footprints.small_enemy", self.footprints.small_enemy),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field });
            }
        }

        let at_least_one = [
            ("obstacle_spawn_odds", self.obstacle_spawn_odds),
            ("enemy_spawn_odds", self.enemy_spawn_odds),
            ("starting_lives", self.starting_lives),
            ("warp_interval", self.warp_interval),
        ];
        for (field, value) in at_least_one {
            if value == 0 {
                return Err(ConfigError::ZeroLimit { field });
            }
        }
        if self.projectile_limit == 0 {
            return Err(ConfigError::ZeroLimit { field: "projectile_limit" });
        }
        if self.max_name_length == 0 {
            return Err(ConfigError::ZeroLimit { field: "max_name_length" });
        }

        Ok(())
    }
}
