//! Obstacle, enemy and debris creation
//!
//! Perimeter spawns are throttled by a per-tick draw; fragments and debris are
//! created at the location of whatever was destroyed.

use glam::Vec2;
use rand::Rng;

use super::rng::{
    PerimeterSide, random_polarity, random_rotation_rate, random_vector_from, rotation_matrix,
};
use super::state::{
    Body, EllipseDebris, Enemy, EnemyKind, EntityId, GameState, Obstacle, ObstacleSize,
    PlayerDebris,
};
use crate::consts::SPLIT_JITTER_DEGREES;

/// Random point on `side` plus an inward-biased movement vector
fn perimeter_spawn<R: Rng + ?Sized>(rng: &mut R, arena: Vec2) -> (Vec2, Vec2) {
    let side = PerimeterSide::random(rng);
    let pos = match side {
        PerimeterSide::Top => Vec2::new(rng.random::<f32>() * arena.x, 0.0),
        PerimeterSide::Left => Vec2::new(0.0, rng.random::<f32>() * arena.y),
        PerimeterSide::Bottom => Vec2::new(rng.random::<f32>() * arena.x, arena.y),
        PerimeterSide::Right => Vec2::new(arena.x, rng.random::<f32>() * arena.y),
    };
    (pos, random_vector_from(rng, side))
}

/// Roll for one starting large obstacle this tick
pub fn spawn_starting_obstacles(state: &mut GameState) {
    if state.starting_obstacles_spawned >= state.config.max_large_obstacles {
        return;
    }
    let odds = state.config.obstacle_spawn_odds;
    if state.rng.random_range(0..odds) != odds - 1 {
        return;
    }

    let (pos, vel) = perimeter_spawn(&mut state.rng, state.arena);
    let rate = random_rotation_rate(
        &mut state.rng,
        state.config.min_rotation_rate,
        state.config.max_rotation_rate,
    );
    spawn_obstacle(state, ObstacleSize::Large, pos, vel, rate);
    state.starting_obstacles_spawned += 1;
}

/// Roll for an enemy once the level's obstacles are all out
pub fn spawn_enemies(state: &mut GameState) {
    let config = &state.config;
    if state.starting_obstacles_spawned < config.max_large_obstacles
        || state.obstacles_destroyed >= config.enemy_spawn_cutoff
        || state.enemies.len() >= config.max_live_enemies
    {
        return;
    }
    let odds = config.enemy_spawn_odds;
    if state.rng.random_range(0..odds) != odds - 1 {
        return;
    }

    let (pos, vel) = perimeter_spawn(&mut state.rng, state.arena);
    let kind = if state.obstacles_destroyed > state.config.small_enemy_threshold
        && state.rng.random_range(0..2) == 0
    {
        EnemyKind::Small
    } else {
        EnemyKind::Large
    };
    spawn_enemy(state, kind, pos, vel);
}

pub fn spawn_obstacle(
    state: &mut GameState,
    class: ObstacleSize,
    pos: Vec2,
    vel: Vec2,
    rotation_rate: f32,
) -> EntityId {
    let id = state.next_entity_id();
    let obstacle = Obstacle::new(id, class, pos, vel, rotation_rate, &state.config);
    state.obstacles.push(obstacle);
    state.note_spawn(id);
    id
}

pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2, vel: Vec2) -> EntityId {
    let id = state.next_entity_id();
    let enemy = Enemy::new(id, kind, pos, vel, &state.config);
    state.enemies.push(enemy);
    state.note_spawn(id);
    log::debug!("{:?} enemy spawned at ({:.0}, {:.0})", kind, pos.x, pos.y);
    id
}

/// Replace a destroyed obstacle with its two fragments (if any).
///
/// Each fragment inherits the parent's movement rotated by up to ±45° and
/// scaled by `base + U[0, 1)`.
pub fn split_obstacle(state: &mut GameState, class: ObstacleSize, pos: Vec2, parent_vel: Vec2) {
    let Some((child, base_scale)) = class.split() else {
        return;
    };

    for _ in 0..2 {
        let jitter = state
            .rng
            .random_range(-SPLIT_JITTER_DEGREES..=SPLIT_JITTER_DEGREES) as f32;
        let scale = base_scale + state.rng.random::<f32>();
        let vel = rotation_matrix(jitter.to_radians()) * parent_vel * scale;
        let rate = random_rotation_rate(
            &mut state.rng,
            state.config.min_rotation_rate,
            state.config.max_rotation_rate,
        );
        spawn_obstacle(state, child, pos, vel, rate);
    }
}

/// Small random drift in [-0.5, 0.5) per axis
fn debris_drift<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5)
}

/// Tumbling ship fragments with staggered lifetimes
pub fn spawn_player_debris(state: &mut GameState, pos: Vec2) {
    for i in 0..state.config.player_debris_amount {
        let polarity = random_polarity(&mut state.rng);
        let vel = debris_drift(&mut state.rng);
        let rotation_rate = state.rng.random::<f32>() * polarity;
        let rotation = state.rng.random_range(0..360) as f32;

        let id = state.next_entity_id();
        state.player_debris.push(PlayerDebris {
            body: Body::new(id, pos, vel, state.config.footprints.player_debris),
            rotation,
            rotation_rate,
            dissipation: i * state.config.player_debris_stagger,
        });
        state.note_spawn(id);
    }
}

pub fn spawn_ellipse_debris(state: &mut GameState, pos: Vec2) {
    for _ in 0..state.config.ellipse_debris_amount {
        let vel = debris_drift(&mut state.rng);
        let id = state.next_entity_id();
        state.ellipse_debris.push(EllipseDebris {
            body: Body::new(id, pos, vel, state.config.footprints.ellipse_debris),
            dissipation: state.config.ellipse_debris_dissipation,
        });
        state.note_spawn(id);
    }
}
