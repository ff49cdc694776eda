//! Simulation core
//!
//! All gameplay logic lives here:
//! - Single-threaded, one tick at a time
//! - Entities owned by per-kind collections on [`GameState`]
//! - Removals deferred to a cleanup pass at the end of each tick
//! - No rendering or input-device dependencies

pub mod collision;
pub mod movement;
pub mod rng;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{Footprint, HitBuffer, HitTarget, kill_player, resolve_collisions};
pub use rng::{
    PerimeterSide, random_polarity, random_rotation_rate, random_vector, random_vector_from,
    rotation_matrix,
};
pub use snapshot::{EntityKind, EntitySnapshot, FrameDelta, GameEvent, HudState, TickReport};
pub use state::{
    Body, Dissipate, EllipseDebris, Enemy, EnemyKind, EntityId, Faction, FireProjectile, GamePhase,
    GameState, Obstacle, ObstacleSize, Player, PlayerDebris, Projectile,
};
pub use tick::{TickInput, tick};
pub use timers::{TimerEvent, Timers};
