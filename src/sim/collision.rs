//! Hit detection and its consequences
//!
//! Every test is a point check: the moving entity's location against the
//! target's axis-aligned footprint. Projectiles are resolved first, then the
//! player. Removals are only flagged here and applied by the cleanup pass.

use glam::Vec2;

use super::snapshot::GameEvent;
use super::spawn::{spawn_ellipse_debris, spawn_player_debris, split_obstacle};
use super::state::{Body, GamePhase, GameState, ObstacleSize};
use super::timers::TimerEvent;

/// Square hit area centered on an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub center: Vec2,
    pub half_extent: f32,
}

impl Footprint {
    pub fn of(body: &Body) -> Self {
        Self {
            center: body.pos,
            half_extent: body.half_extent(),
        }
    }

    /// Inclusive on the edges
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_extent && d.y <= self.half_extent
    }
}

/// What a point check landed on, by index into the owning collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Player,
    Enemy(usize),
    Obstacle(usize),
    Projectile(usize),
}

/// Scratch list of targets found by one point check, in traversal order
#[derive(Debug, Default)]
pub struct HitBuffer {
    hits: Vec<HitTarget>,
}

impl HitBuffer {
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    pub fn push(&mut self, target: HitTarget) {
        self.hits.push(target);
    }

    pub fn first(&self) -> Option<HitTarget> {
        self.hits.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Something destroyed this tick whose debris/fragments are still owed
enum Wreck {
    Obstacle {
        class: ObstacleSize,
        pos: Vec2,
        vel: Vec2,
    },
    Enemy {
        pos: Vec2,
    },
}

/// Run both collision passes for the current tick
pub fn resolve_collisions(state: &mut GameState) {
    let mut hits = HitBuffer::default();
    let mut wrecks = Vec::new();

    resolve_projectiles(state, &mut hits, &mut wrecks);
    resolve_player(state, &mut hits);

    // Fragments appear after the passes so they cannot be hit on the tick
    // their parent died
    for wreck in wrecks {
        match wreck {
            Wreck::Obstacle { class, pos, vel } => {
                spawn_ellipse_debris(state, pos);
                split_obstacle(state, class, pos, vel);
            }
            Wreck::Enemy { pos } => spawn_ellipse_debris(state, pos),
        }
    }
}

/// Player first, then enemies, then obstacles. Entities already flagged for
/// removal and enemies of the projectile's own faction are skipped.
fn scan_projectile(state: &GameState, index: usize, hits: &mut HitBuffer) {
    hits.clear();
    let projectile = &state.projectiles[index];
    let point = projectile.body.pos;
    let faction = projectile.body.faction;

    if let Some(player) = state.player.as_ref().filter(|p| p.is_collidable()) {
        if Footprint::of(&player.body).contains(point) {
            hits.push(HitTarget::Player);
        }
    }
    for (i, enemy) in state.enemies.iter().enumerate() {
        if enemy.body.faction == faction || state.pending.contains(enemy.body.id) {
            continue;
        }
        if Footprint::of(&enemy.body).contains(point) {
            hits.push(HitTarget::Enemy(i));
        }
    }
    for (i, obstacle) in state.obstacles.iter().enumerate() {
        if state.pending.contains(obstacle.body.id) {
            continue;
        }
        if Footprint::of(&obstacle.body).contains(point) {
            hits.push(HitTarget::Obstacle(i));
        }
    }
}

fn resolve_projectiles(state: &mut GameState, hits: &mut HitBuffer, wrecks: &mut Vec<Wreck>) {
    for index in 0..state.projectiles.len() {
        let projectile_id = state.projectiles[index].body.id;
        if state.pending.contains(projectile_id) {
            continue;
        }

        scan_projectile(state, index, hits);
        let Some(target) = hits.first() else {
            continue;
        };

        let scored = state.player_faction() == Some(state.projectiles[index].body.faction);
        state.pending.insert(projectile_id);

        match target {
            HitTarget::Player => kill_player(state),
            HitTarget::Enemy(i) => {
                let enemy = &state.enemies[i];
                let (id, kind, pos) = (enemy.body.id, enemy.kind, enemy.body.pos);
                state.pending.insert(id);
                if scored {
                    state.add_to_score(u64::from(kind.score_value()));
                }
                wrecks.push(Wreck::Enemy { pos });
                state.emit(GameEvent::EnemyDestroyed { kind, pos, scored });
            }
            HitTarget::Obstacle(i) => {
                let obstacle = &state.obstacles[i];
                let (id, class, pos, vel) = (
                    obstacle.body.id,
                    obstacle.class,
                    obstacle.body.pos,
                    obstacle.body.vel,
                );
                state.pending.insert(id);
                if scored {
                    state.add_to_score(u64::from(class.score_value()));
                }
                wrecks.push(Wreck::Obstacle { class, pos, vel });
                state.emit(GameEvent::ObstacleDestroyed {
                    size: class,
                    pos,
                    scored,
                });
            }
            HitTarget::Projectile(_) => {}
        }
    }
}

/// Enemies, then obstacles, then projectiles
fn scan_player(state: &GameState, hits: &mut HitBuffer) {
    hits.clear();
    let Some(player) = state.player.as_ref().filter(|p| p.is_collidable()) else {
        return;
    };
    let point = player.body.pos;

    for (i, enemy) in state.enemies.iter().enumerate() {
        if !state.pending.contains(enemy.body.id) && Footprint::of(&enemy.body).contains(point) {
            hits.push(HitTarget::Enemy(i));
        }
    }
    for (i, obstacle) in state.obstacles.iter().enumerate() {
        if !state.pending.contains(obstacle.body.id)
            && Footprint::of(&obstacle.body).contains(point)
        {
            hits.push(HitTarget::Obstacle(i));
        }
    }
    for (i, projectile) in state.projectiles.iter().enumerate() {
        if !state.pending.contains(projectile.body.id)
            && Footprint::of(&projectile.body).contains(point)
        {
            hits.push(HitTarget::Projectile(i));
        }
    }
}

/// Whatever the player ran into survives; only the ship is lost
fn resolve_player(state: &mut GameState, hits: &mut HitBuffer) {
    scan_player(state, hits);
    if !hits.is_empty() {
        kill_player(state);
    }
}

/// Lose a life, scatter debris, and end the game on the last one
pub fn kill_player(state: &mut GameState) {
    let Some(player) = state.player.as_mut() else {
        return;
    };
    if player.dead {
        return;
    }
    player.dead = true;
    player.warping = false;
    player.speed = 0.0;
    let (id, pos) = (player.body.id, player.body.pos);

    state.note_removal(id);
    state.decrement_lives();
    spawn_player_debris(state, pos);
    state.emit(GameEvent::PlayerKilled {
        pos,
        lives_left: state.lives,
    });
    log::debug!("Player destroyed at ({:.0}, {:.0}), {} lives left", pos.x, pos.y, state.lives);

    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        state.timers.schedule(TimerEvent::EnterName, state.config.game_over_delay);
        state.emit(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;
    use crate::sim::state::{Enemy, EnemyKind, Faction, Obstacle, Projectile};

    fn state() -> GameState {
        let mut state = GameState::with_seed(GameConfig::default(), 3).expect("valid config");
        state.resize(400.0, 400.0);
        state.phase = GamePhase::GameActive;
        state.spawn_player();
        state
    }

    fn add_obstacle(state: &mut GameState, class: ObstacleSize, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let config = state.config.clone();
        state
            .obstacles
            .push(Obstacle::new(id, class, pos, Vec2::new(1.0, 0.0), 1.5, &config));
        id
    }

    fn add_projectile(state: &mut GameState, pos: Vec2, faction: Faction) -> u32 {
        let id = state.next_entity_id();
        state.projectiles.push(Projectile {
            body: Body {
                id,
                pos,
                vel: Vec2::ZERO,
                faction,
                size: state.config.footprints.projectile,
            },
            rotation: 0.0,
            dissipation: 100,
        });
        id
    }

    fn player_faction(state: &GameState) -> Faction {
        state.player_faction().expect("player spawned")
    }

    fn resolve(state: &mut GameState) {
        resolve_collisions(state);
        state.apply_pending_removals();
    }

    #[test]
    fn test_footprint_contains_edges() {
        let fp = Footprint {
            center: Vec2::new(10.0, 10.0),
            half_extent: 5.0,
        };
        assert!(fp.contains(Vec2::new(15.0, 5.0)));
        assert!(!fp.contains(Vec2::new(15.1, 10.0)));
        assert!(!fp.contains(Vec2::new(10.0, 4.9)));
    }

    #[test]
    fn test_large_obstacle_splits_into_two_medium() {
        let mut state = state();
        let faction = player_faction(&state);
        add_obstacle(&mut state, ObstacleSize::Large, Vec2::new(50.0, 50.0));
        add_projectile(&mut state, Vec2::new(52.0, 48.0), faction);

        resolve(&mut state);
        assert_eq!(state.obstacles.len(), 2);
        assert!(state.obstacles.iter().all(|o| o.class == ObstacleSize::Medium));
        assert!(state.projectiles.is_empty());
        assert_eq!(state.ellipse_debris.len(), 6);
        assert_eq!(state.score, 32);
        assert_eq!(state.obstacles_destroyed, 1);
    }

    #[test]
    fn test_medium_and_small_split_rules() {
        let mut state = state();
        let faction = player_faction(&state);
        add_obstacle(&mut state, ObstacleSize::Medium, Vec2::new(50.0, 50.0));
        add_projectile(&mut state, Vec2::new(50.0, 50.0), faction);
        resolve(&mut state);
        assert_eq!(state.obstacles.len(), 2);
        assert!(state.obstacles.iter().all(|o| o.class == ObstacleSize::Small));

        state.obstacles.clear();
        add_obstacle(&mut state, ObstacleSize::Small, Vec2::new(50.0, 50.0));
        add_projectile(&mut state, Vec2::new(50.0, 50.0), faction);
        resolve(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 64 + 128);
    }

    #[test]
    fn test_enemy_projectile_does_not_score() {
        let mut state = state();
        add_obstacle(&mut state, ObstacleSize::Small, Vec2::new(50.0, 50.0));
        add_projectile(&mut state, Vec2::new(50.0, 50.0), Faction(999));

        resolve(&mut state);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::ObstacleDestroyed { scored: false, .. }
        )));
    }

    #[test]
    fn test_enemy_ignores_own_projectile() {
        let mut state = state();
        let id = state.next_entity_id();
        let config = state.config.clone();
        let enemy = Enemy::new(id, EnemyKind::Large, Vec2::new(50.0, 50.0), Vec2::ZERO, &config);
        let faction = enemy.body.faction;
        state.enemies.push(enemy);
        add_projectile(&mut state, Vec2::new(50.0, 50.0), faction);

        resolve(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_player_projectile_destroys_enemy() {
        let mut state = state();
        let faction = player_faction(&state);
        let id = state.next_entity_id();
        let config = state.config.clone();
        state.enemies.push(Enemy::new(
            id,
            EnemyKind::Small,
            Vec2::new(60.0, 60.0),
            Vec2::ZERO,
            &config,
        ));
        add_projectile(&mut state, Vec2::new(60.0, 60.0), faction);

        resolve(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 512);
        assert_eq!(state.ellipse_debris.len(), 6);
    }

    #[test]
    fn test_friendly_fire_kills_player() {
        let mut state = state();
        let faction = player_faction(&state);
        let center = state.arena_center();
        add_projectile(&mut state, center + Vec2::new(3.0, 0.0), faction);

        resolve(&mut state);
        assert!(state.player.as_ref().is_some_and(|p| p.dead));
        assert_eq!(state.lives, 2);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_obstacle_on_player_kills() {
        let mut state = state();
        let center = state.arena_center();
        let obstacle = add_obstacle(&mut state, ObstacleSize::Large, center);

        resolve(&mut state);
        assert!(state.player.as_ref().is_some_and(|p| p.dead));
        assert_eq!(state.lives, 2);
        assert_eq!(state.player_debris.len(), 6);
        // The obstacle survives the impact
        assert_eq!(state.obstacles[0].body.id, obstacle);
        assert_eq!(state.phase, GamePhase::GameActive);
    }

    #[test]
    fn test_warping_player_is_intangible() {
        let mut state = state();
        if let Some(p) = state.player.as_mut() {
            p.warping = true;
        }
        let center = state.arena_center();
        add_obstacle(&mut state, ObstacleSize::Large, center);

        resolve(&mut state);
        assert!(state.player.as_ref().is_some_and(|p| !p.dead));
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_one_target_per_obstacle() {
        let mut state = state();
        let faction = player_faction(&state);
        add_obstacle(&mut state, ObstacleSize::Large, Vec2::new(50.0, 50.0));
        add_projectile(&mut state, Vec2::new(50.0, 50.0), faction);
        let second = add_projectile(&mut state, Vec2::new(51.0, 50.0), faction);

        resolve(&mut state);
        assert_eq!(state.score, 32);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].body.id, second);
    }

    #[test]
    fn test_player_running_into_projectile_leaves_it() {
        let mut state = state();
        let center = state.arena_center();
        let shot = add_projectile(&mut state, center, Faction(999));

        let mut hits = HitBuffer::default();
        resolve_player(&mut state, &mut hits);
        state.apply_pending_removals();
        assert!(state.player.as_ref().is_some_and(|p| p.dead));
        assert_eq!(state.lives, 2);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].body.id, shot);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = state();
        state.lives = 1;
        kill_player(&mut state);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.timers.is_pending(TimerEvent::EnterName));

        // Already dead: no double penalty
        kill_player(&mut state);
        assert_eq!(state.player_debris.len(), 6);
    }
}
