//! Symbol Blaster - arcade space-shooter simulation core
//!
//! Core modules:
//! - `sim`: Tick pipeline (spawning, movement, collisions, game state)
//! - `settings`: Resolved numeric gameplay configuration
//! - `highscores`: All-time leaderboard

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{ConfigError, ControlMode, GameConfig};

use glam::Vec2;

/// Engine constants that are not tunable gameplay parameters
pub mod consts {
    /// Fixed timestep used by the native driver (60 Hz display cadence)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Score values per destroyed entity
    pub const LARGE_ENEMY_SCORE: u32 = 256;
    pub const SMALL_ENEMY_SCORE: u32 = 512;
    pub const LARGE_OBSTACLE_SCORE: u32 = 32;
    pub const MEDIUM_OBSTACLE_SCORE: u32 = 64;
    pub const SMALL_OBSTACLE_SCORE: u32 = 128;

    /// Maximum angular jitter applied to split fragments (degrees)
    pub const SPLIT_JITTER_DEGREES: i32 = 45;
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // Tiny negatives round up to exactly 360
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for an angle in degrees (screen space, y grows downward)
#[inline]
pub fn heading_from_degrees(angle_degrees: f32) -> Vec2 {
    let radians = angle_degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Angle in degrees, [0, 360), of the vector pointing from `from` to `to`
#[inline]
pub fn degrees_toward(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    normalize_degrees(delta.y.atan2(delta.x).to_degrees())
}
