//! Movement and control integration
//!
//! Advances every entity by one tick. The player follows one of two control
//! schemes; everything else moves along its velocity and either wraps around
//! the arena or counts down to removal.

use glam::Vec2;
use rand::Rng;

use super::rng::random_vector;
use super::snapshot::GameEvent;
use super::state::{Dissipate, EnemyKind, FireProjectile, GameState, PendingRemoval, Player};
use super::tick::TickInput;
use crate::settings::{ControlMode, GameConfig};
use crate::{degrees_toward, normalize_degrees};

/// Toroidal wrap. An entity must travel `margin` past an edge before it
/// reappears `margin` beyond the opposite one.
pub fn wrap_position(pos: Vec2, arena: Vec2, margin: f32) -> Vec2 {
    let mut out = pos;
    if out.x > arena.x + margin {
        out.x = -margin;
    } else if out.x < -margin {
        out.x = arena.x + margin;
    }
    if out.y > arena.y + margin {
        out.y = -margin;
    } else if out.y < -margin {
        out.y = arena.y + margin;
    }
    out
}

/// Fire and warp, both on the press edge
pub fn apply_player_actions(state: &mut GameState, input: &TickInput) {
    let prev = state.prev_input;

    if input.fire && !prev.fire {
        state.fire_player_projectile();
    }
    if input.warp && !prev.warp {
        start_warp(state);
    }
}

fn start_warp(state: &mut GameState) {
    let Some(player) = state.player.as_mut() else {
        return;
    };
    if player.dead || player.warping {
        return;
    }
    player.warping = true;
    player.warp_countdown = state.config.warp_interval;
    state.emit(GameEvent::WarpStarted);
}

/// Advance the player. No-op when there is no live player.
pub fn move_player(state: &mut GameState, input: &TickInput) {
    let arena = state.arena;
    let Some(player) = state.player.as_mut() else {
        return;
    };
    if player.dead {
        return;
    }

    if player.warping {
        player.warp_countdown = player.warp_countdown.saturating_sub(1);
        if player.warp_countdown > 0 {
            return;
        }
        let pos = Vec2::new(
            state.rng.random::<f32>() * arena.x,
            state.rng.random::<f32>() * arena.y,
        );
        player.body.pos = pos;
        player.warping = false;
        player.warp_countdown = state.config.warp_interval;
        state.emit(GameEvent::WarpEnded { pos });
        return;
    }

    match state.config.control_mode {
        ControlMode::Retro => steer_retro(player, input, &state.config),
        ControlMode::Directional => steer_directional(player, input, &state.config),
    }

    player.body.pos += player.body.vel;
    player.body.pos = wrap_position(player.body.pos, arena, 0.0);
}

/// Rotate with left/right (left wins), thrust along the nose with up.
///
/// Speed ramps by `increment * elapsed_ticks`; releasing thrust keeps the last
/// direction of travel while the ship slows down.
fn steer_retro(player: &mut Player, input: &TickInput, config: &GameConfig) {
    if input.left {
        player.rotation -= config.rotation_increment;
    } else if input.right {
        player.rotation += config.rotation_increment;
    }
    player.rotation = normalize_degrees(player.rotation);

    let direction = if input.up {
        player.decel_ticks = 0;
        player.accel_ticks += 1;
        player.speed += config.acceleration_increment * player.accel_ticks as f32;
        player.heading()
    } else if player.speed > 0.0 {
        player.accel_ticks = 0;
        player.decel_ticks += 1;
        player.speed -= config.deceleration_increment * player.decel_ticks as f32;
        player.body.vel.normalize_or_zero()
    } else {
        // At rest
        player.accel_ticks = 0;
        player.decel_ticks = 0;
        Vec2::ZERO
    };
    player.speed = player.speed.clamp(0.0, config.acceleration_limit);
    player.body.vel = direction * player.speed;
}

/// Nudge each velocity axis while its key is held, decay it otherwise.
/// Left beats right and up beats down.
fn steer_directional(player: &mut Player, input: &TickInput, config: &GameConfig) {
    let inc = config.directional_increment;
    let limit = config.acceleration_limit;
    let vel = &mut player.body.vel;

    if input.left {
        vel.x = (vel.x - inc).max(-limit);
    } else if input.right {
        vel.x = (vel.x + inc).min(limit);
    } else {
        vel.x = decay(vel.x, inc);
    }

    if input.up {
        vel.y = (vel.y - inc).max(-limit);
    } else if input.down {
        vel.y = (vel.y + inc).min(limit);
    } else {
        vel.y = decay(vel.y, inc);
    }

    let snapped = match (input.up, input.down, input.left, input.right) {
        (true, _, true, _) => Some(315.0),
        (true, _, false, true) => Some(45.0),
        (false, true, true, _) => Some(225.0),
        (false, true, false, true) => Some(135.0),
        (true, _, false, false) => Some(0.0),
        (false, true, false, false) => Some(180.0),
        (false, false, true, _) => Some(270.0),
        (false, false, false, true) => Some(90.0),
        (false, false, false, false) => None,
    };
    if let Some(rotation) = snapped {
        player.rotation = rotation;
    }
    player.speed = player.body.vel.length();
}

/// Step `value` toward zero by `step` without crossing it
fn decay(value: f32, step: f32) -> f32 {
    if value > 0.0 {
        (value - step).max(0.0)
    } else {
        (value + step).min(0.0)
    }
}

pub fn move_obstacles(state: &mut GameState) {
    let arena = state.arena;
    for obstacle in &mut state.obstacles {
        let body = &mut obstacle.body;
        body.pos = wrap_position(body.pos, arena, body.half_extent());
        body.pos += body.vel;
        obstacle.rotation = normalize_degrees(obstacle.rotation + obstacle.rotation_rate);
    }
}

/// Wander, re-pick direction and fire on their own countdowns
pub fn move_enemies(state: &mut GameState) {
    let arena = state.arena;
    let target = state
        .player
        .as_ref()
        .filter(|p| !p.dead)
        .map(|p| p.body.pos);
    let mut shots: Vec<(usize, f32)> = Vec::new();

    for (index, enemy) in state.enemies.iter_mut().enumerate() {
        if enemy.direction_countdown == 0 {
            enemy.body.vel = random_vector(&mut state.rng, true, true);
            enemy.direction_countdown = state.config.direction_interval;
        }
        if enemy.fire_countdown == 0 {
            let angle = match enemy.kind {
                EnemyKind::Large => Some(state.rng.random_range(0..360) as f32),
                EnemyKind::Small => target.map(|t| degrees_toward(enemy.body.pos, t)),
            };
            if let Some(angle) = angle {
                shots.push((index, angle));
            }
            enemy.fire_countdown = state.config.fire_interval;
        }

        enemy.body.pos = wrap_position(enemy.body.pos, arena, 0.0);
        enemy.body.pos += enemy.body.vel;
        enemy.direction_countdown = enemy.direction_countdown.saturating_sub(1);
        enemy.fire_countdown = enemy.fire_countdown.saturating_sub(1);
    }

    for (index, angle) in shots {
        let faction = state.enemies[index].body.faction;
        if !state.check_projectile_limit(faction) {
            continue;
        }
        let id = state.next_entity_id();
        let projectile = state.enemies[index].fire(id, angle, &state.config);
        state.projectiles.push(projectile);
        state.note_spawn(id);
        state.emit(GameEvent::ProjectileFired { faction });
    }
}

/// Flag the entity once its countdown is exhausted, otherwise count down.
/// Returns whether the entity is still live this tick.
fn count_down<T: Dissipate>(entity: &mut T, pending: &mut PendingRemoval) -> bool {
    if *entity.countdown_mut() == 0 {
        pending.insert(entity.body().id);
        return false;
    }
    *entity.countdown_mut() -= 1;
    true
}

pub fn move_projectiles(state: &mut GameState) {
    let arena = state.arena;
    for projectile in &mut state.projectiles {
        if !count_down(projectile, &mut state.pending) {
            continue;
        }
        let body = &mut projectile.body;
        body.pos = wrap_position(body.pos, arena, 0.0);
        body.pos += body.vel;
    }
}

/// Debris drifts without wrapping
pub fn move_debris(state: &mut GameState) {
    for debris in &mut state.player_debris {
        if !count_down(debris, &mut state.pending) {
            continue;
        }
        debris.body.pos += debris.body.vel;
        debris.rotation = normalize_degrees(debris.rotation + debris.rotation_rate);
    }
    for debris in &mut state.ellipse_debris {
        if !count_down(debris, &mut state.pending) {
            continue;
        }
        debris.body.pos += debris.body.vel;
    }
}
