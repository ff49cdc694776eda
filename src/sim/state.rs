//! Game state and core simulation types
//!
//! Every entity embeds a [`Body`]; the session owns one collection per kind.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rng::rotation_matrix;
use super::snapshot::{FrameDelta, GameEvent};
use super::tick::TickInput;
use super::timers::Timers;
use crate::consts::*;
use crate::heading_from_degrees;
use crate::highscores::HighScores;
use crate::settings::{ConfigError, GameConfig};

/// Stable identity of an entity within a session
pub type EntityId = u32;

/// Opaque identity tying projectiles to whoever fired them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction(pub EntityId);

/// Major game states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    ReadyToPlay,
    GameActive,
    /// Last life lost; debris keeps animating until name entry
    GameOver,
    EnterName,
    ShowScores,
}

/// Kinematic state shared by every entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub faction: Faction,
    /// Full visual extent, used for footprints and wrap margins
    pub size: f32,
}

impl Body {
    /// Body owned by its own faction
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            faction: Faction(id),
            size,
        }
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }
}

/// Entities that expire after a fixed number of ticks
pub trait Dissipate {
    fn body(&self) -> &Body;
    fn countdown_mut(&mut self) -> &mut u32;
}

/// Entities that can fire projectiles
pub trait FireProjectile {
    fn shooter_body(&self) -> &Body;

    /// Muzzle position in the shooter's frame, before rotation and 2x scale
    fn muzzle_offset(&self) -> Vec2;

    /// Build a projectile heading along `angle_degrees`.
    ///
    /// The projectile's rotation is `angle_degrees - 180` and it carries the
    /// shooter's faction.
    fn fire(&self, id: EntityId, angle_degrees: f32, config: &GameConfig) -> Projectile {
        let body = self.shooter_body();
        let heading = heading_from_degrees(angle_degrees);
        let spawn = body.pos + rotation_matrix(angle_degrees.to_radians()) * self.muzzle_offset() * 2.0;

        Projectile {
            body: Body {
                id,
                pos: spawn,
                vel: heading * config.projectile_velocity,
                faction: body.faction,
                size: config.footprints.projectile,
            },
            rotation: angle_degrees - 180.0,
            dissipation: config.projectile_dissipation,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Degrees, 0 = nose up, clockwise
    pub rotation: f32,
    pub speed: f32,
    pub accel_ticks: u32,
    pub decel_ticks: u32,
    pub dead: bool,
    pub warping: bool,
    pub warp_countdown: u32,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, config: &GameConfig) -> Self {
        Self {
            body: Body::new(id, pos, Vec2::ZERO, config.footprints.player),
            rotation: 0.0,
            speed: 0.0,
            accel_ticks: 0,
            decel_ticks: 0,
            dead: false,
            warping: false,
            warp_countdown: config.warp_interval,
        }
    }

    /// Alive and not in warp
    pub fn is_collidable(&self) -> bool {
        !self.dead && !self.warping
    }

    /// Direction the nose points
    pub fn heading(&self) -> Vec2 {
        heading_from_degrees(self.rotation - 90.0)
    }
}

impl FireProjectile for Player {
    fn shooter_body(&self) -> &Body {
        &self.body
    }

    fn muzzle_offset(&self) -> Vec2 {
        Vec2::new(self.body.size / 3.0, -2.0)
    }
}

/// A shot from the player or an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub rotation: f32,
    pub dissipation: u32,
}

impl Dissipate for Projectile {
    fn body(&self) -> &Body {
        &self.body
    }

    fn countdown_mut(&mut self) -> &mut u32 {
        &mut self.dissipation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fires in random directions
    Large,
    /// Aims at the player
    Small,
}

impl EnemyKind {
    pub fn score_value(&self) -> u32 {
        match self {
            EnemyKind::Large => LARGE_ENEMY_SCORE,
            EnemyKind::Small => SMALL_ENEMY_SCORE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub direction_countdown: u32,
    pub fire_countdown: u32,
}

impl Enemy {
    pub fn new(id: EntityId, kind: EnemyKind, pos: Vec2, vel: Vec2, config: &GameConfig) -> Self {
        let size = match kind {
            EnemyKind::Large => config.footprints.large_enemy,
            EnemyKind::Small => config.footprints.small_enemy,
        };
        Self {
            body: Body::new(id, pos, vel, size),
            kind,
            direction_countdown: config.direction_interval,
            fire_countdown: config.fire_interval,
        }
    }
}

impl FireProjectile for Enemy {
    fn shooter_body(&self) -> &Body {
        &self.body
    }

    fn muzzle_offset(&self) -> Vec2 {
        Vec2::new(self.body.size / 3.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleSize {
    Large,
    Medium,
    Small,
}

impl ObstacleSize {
    pub fn score_value(&self) -> u32 {
        match self {
            ObstacleSize::Large => LARGE_OBSTACLE_SCORE,
            ObstacleSize::Medium => MEDIUM_OBSTACLE_SCORE,
            ObstacleSize::Small => SMALL_OBSTACLE_SCORE,
        }
    }

    /// Fragment size and base speed multiplier produced on destruction
    pub fn split(&self) -> Option<(ObstacleSize, f32)> {
        match self {
            ObstacleSize::Large => Some((ObstacleSize::Medium, 1.0)),
            ObstacleSize::Medium => Some((ObstacleSize::Small, 1.5)),
            ObstacleSize::Small => None,
        }
    }

    pub fn footprint(&self, config: &GameConfig) -> f32 {
        match self {
            ObstacleSize::Large => config.footprints.large_obstacle,
            ObstacleSize::Medium => config.footprints.medium_obstacle,
            ObstacleSize::Small => config.footprints.small_obstacle,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub class: ObstacleSize,
    pub rotation: f32,
    /// Degrees per tick
    pub rotation_rate: f32,
}

impl Obstacle {
    pub fn new(
        id: EntityId,
        class: ObstacleSize,
        pos: Vec2,
        vel: Vec2,
        rotation_rate: f32,
        config: &GameConfig,
    ) -> Self {
        Self {
            body: Body::new(id, pos, vel, class.footprint(config)),
            class,
            rotation: 0.0,
            rotation_rate,
        }
    }
}

/// Tumbling fragment of the player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerDebris {
    pub body: Body,
    pub rotation: f32,
    pub rotation_rate: f32,
    pub dissipation: u32,
}

impl Dissipate for PlayerDebris {
    fn body(&self) -> &Body {
        &self.body
    }

    fn countdown_mut(&mut self) -> &mut u32 {
        &mut self.dissipation
    }
}

/// Spark left by a destroyed obstacle or enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EllipseDebris {
    pub body: Body,
    pub dissipation: u32,
}

impl Dissipate for EllipseDebris {
    fn body(&self) -> &Body {
        &self.body
    }

    fn countdown_mut(&mut self) -> &mut u32 {
        &mut self.dissipation
    }
}

/// Entities flagged during a tick, removed in the cleanup pass
#[derive(Debug, Clone, Default)]
pub struct PendingRemoval {
    ids: HashSet<EntityId>,
}

impl PendingRemoval {
    pub fn insert(&mut self, id: EntityId) {
        self.ids.insert(id);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub(crate) rng: Pcg32,
    /// Arena width and height
    pub arena: Vec2,
    pub phase: GamePhase,
    pub score: u64,
    /// Best of the leaderboard and the last finished game
    pub high_score: u64,
    pub lives: u32,
    pub lives_display: String,
    /// 1-based level counter
    pub level: u32,
    pub show_level_banner: bool,
    pub starting_obstacles_spawned: u32,
    pub obstacles_destroyed: u32,
    /// Simulation tick counter
    pub time_ticks: u64,

    pub player: Option<Player>,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub player_debris: Vec<PlayerDebris>,
    pub ellipse_debris: Vec<EllipseDebris>,

    pub high_scores: HighScores,

    pub(crate) pending: PendingRemoval,
    pub(crate) timers: Timers,
    pub(crate) delta: FrameDelta,
    pub(crate) events: Vec<GameEvent>,
    /// Control state of the previous tick, for press edges
    pub(crate) prev_input: TickInput,
    next_id: EntityId,
}

impl GameState {
    /// New session seeded from OS entropy
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let rng = Pcg32::from_rng(&mut rand::rng());
        Self::with_rng(config, rng)
    }

    /// New session with a fixed seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: Pcg32) -> Result<Self, ConfigError> {
        config.validate()?;
        let lives = config.starting_lives;
        let mut state = Self {
            config,
            rng,
            arena: Vec2::ZERO,
            phase: GamePhase::ReadyToPlay,
            score: 0,
            high_score: 0,
            lives,
            lives_display: String::new(),
            level: 1,
            show_level_banner: false,
            starting_obstacles_spawned: 0,
            obstacles_destroyed: 0,
            time_ticks: 0,
            player: None,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            player_debris: Vec::new(),
            ellipse_debris: Vec::new(),
            high_scores: HighScores::new(),
            pending: PendingRemoval::default(),
            timers: Timers::default(),
            delta: FrameDelta::default(),
            events: Vec::new(),
            prev_input: TickInput::default(),
            next_id: 1,
        };
        state.rebuild_lives_display();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Arena dimensions pushed by the host
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Vec2::new(width.max(0.0), height.max(0.0));
    }

    pub fn arena_center(&self) -> Vec2 {
        self.arena / 2.0
    }

    pub fn add_to_score(&mut self, points: u64) {
        self.score += points;
    }

    pub fn decrement_lives(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.rebuild_lives_display();
    }

    pub fn rebuild_lives_display(&mut self) {
        self.lives_display = self.config.lives_glyph.repeat(self.lives as usize);
    }

    /// Faction of the current player, dead or alive
    pub fn player_faction(&self) -> Option<Faction> {
        self.player.as_ref().map(|p| p.body.faction)
    }

    pub fn player_alive(&self) -> bool {
        self.player.as_ref().is_some_and(|p| !p.dead)
    }

    /// True while `faction` may fire another projectile
    pub fn check_projectile_limit(&self, faction: Faction) -> bool {
        self.projectiles
            .iter()
            .filter(|p| p.body.faction == faction)
            .count()
            < self.config.projectile_limit
    }

    /// Record a newly created entity in this tick's delta
    pub(crate) fn note_spawn(&mut self, id: EntityId) {
        self.delta.spawned.push(id);
    }

    pub(crate) fn note_removal(&mut self, id: EntityId) {
        self.delta.removed.push(id);
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Spawn a fresh player at arena center with zero velocity
    pub fn spawn_player(&mut self) {
        let id = self.next_entity_id();
        let center = self.arena_center();
        self.player = Some(Player::new(id, center, &self.config));
        self.note_spawn(id);
    }

    /// Fire from the player along its heading, if alive and under the limit.
    ///
    /// Returns the projectile ID on success.
    pub fn fire_player_projectile(&mut self) -> Option<EntityId> {
        let (faction, angle) = match &self.player {
            Some(p) if !p.dead && !p.warping => (p.body.faction, p.rotation - 90.0),
            _ => return None,
        };
        if !self.check_projectile_limit(faction) {
            return None;
        }

        let id = self.next_entity_id();
        let projectile = self.player.as_ref()?.fire(id, angle, &self.config);
        self.projectiles.push(projectile);
        self.note_spawn(id);
        self.emit(GameEvent::ProjectileFired { faction });
        Some(id)
    }

    /// Remove every entity flagged during the tick
    pub(crate) fn apply_pending_removals(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let pending = std::mem::take(&mut self.pending);
        let mut removed = Vec::new();

        let before = self.obstacles.len();
        self.obstacles.retain(|o| {
            let keep = !pending.contains(o.body.id);
            if !keep {
                removed.push(o.body.id);
            }
            keep
        });
        self.obstacles_destroyed += (before - self.obstacles.len()) as u32;

        self.projectiles.retain(|p| {
            let keep = !pending.contains(p.body.id);
            if !keep {
                removed.push(p.body.id);
            }
            keep
        });
        self.enemies.retain(|e| {
            let keep = !pending.contains(e.body.id);
            if !keep {
                removed.push(e.body.id);
            }
            keep
        });
        self.player_debris.retain(|d| {
            let keep = !pending.contains(d.body.id);
            if !keep {
                removed.push(d.body.id);
            }
            keep
        });
        self.ellipse_debris.retain(|d| {
            let keep = !pending.contains(d.body.id);
            if !keep {
                removed.push(d.body.id);
            }
            keep
        });

        for id in removed {
            self.note_removal(id);
        }
    }

    /// Clear arena contents. The player survives unless `keep_player` is false.
    pub(crate) fn clear_arena(&mut self, keep_player: bool) {
        let mut removed: Vec<EntityId> = Vec::new();
        removed.extend(self.obstacles.drain(..).map(|o| o.body.id));
        removed.extend(self.projectiles.drain(..).map(|p| p.body.id));
        removed.extend(self.enemies.drain(..).map(|e| e.body.id));
        removed.extend(self.player_debris.drain(..).map(|d| d.body.id));
        removed.extend(self.ellipse_debris.drain(..).map(|d| d.body.id));
        if !keep_player {
            if let Some(player) = self.player.take() {
                if !player.dead {
                    removed.push(player.body.id);
                }
            }
        }
        for id in removed {
            self.note_removal(id);
        }

        self.pending.clear();
        self.starting_obstacles_spawned = 0;
        self.obstacles_destroyed = 0;
    }
}
