//! Per-frame tick pipeline and session state machine
//!
//! `tick` is the only entry point that advances the world. Each active frame
//! runs spawn, movement, collisions and cleanup in that order, then checks
//! for respawn and level completion.

use super::collision::resolve_collisions;
use super::movement::{
    apply_player_actions, move_debris, move_enemies, move_obstacles, move_player,
    move_projectiles,
};
use super::snapshot::{GameEvent, TickReport};
use super::spawn::{spawn_enemies, spawn_starting_obstacles};
use super::state::{GamePhase, GameState};
use super::timers::TimerEvent;

/// Control state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Thrust in retro mode
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub warp: bool,
}

/// Advance the session by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickReport {
    for event in state.timers.advance(dt) {
        match event {
            TimerEvent::EnterName => enter_name(state),
            TimerEvent::HideLevelBanner => state.show_level_banner = false,
        }
    }

    match state.phase {
        GamePhase::GameActive => run_active(state, input),
        // Only the wreckage keeps moving
        GamePhase::GameOver => {
            move_debris(state);
            state.apply_pending_removals();
        }
        GamePhase::ReadyToPlay | GamePhase::EnterName | GamePhase::ShowScores => {}
    }

    state.prev_input = *input;
    state.take_report()
}

fn run_active(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    spawn_starting_obstacles(state);
    spawn_enemies(state);

    apply_player_actions(state, input);
    move_player(state, input);
    move_obstacles(state);
    move_enemies(state);
    move_projectiles(state);
    move_debris(state);

    resolve_collisions(state);
    state.apply_pending_removals();

    if state.phase != GamePhase::GameActive {
        return;
    }

    let awaiting_respawn = state.player.as_ref().is_some_and(|p| p.dead);
    if awaiting_respawn && state.player_debris.is_empty() {
        state.spawn_player();
        state.emit(GameEvent::PlayerRespawned);
    }

    if state.starting_obstacles_spawned >= state.config.max_large_obstacles
        && state.obstacles.is_empty()
        && state.enemies.is_empty()
    {
        clear_level(state);
    }
}

fn clear_level(state: &mut GameState) {
    let cleared = state.level;
    state.level += 1;
    state.clear_arena(true);
    state.show_level_banner = true;
    state
        .timers
        .schedule(TimerEvent::HideLevelBanner, state.config.level_banner_delay);
    state.emit(GameEvent::LevelCleared { level: cleared });
    log::info!("Level {} cleared, starting level {}", cleared, state.level);
}

fn enter_name(state: &mut GameState) {
    state.clear_arena(false);
    state.high_score = state.high_scores.best_with(state.score);
    state.phase = GamePhase::EnterName;
    state.emit(GameEvent::EnterName);
}

impl GameState {
    /// Leave the title screen and put the player in the arena
    pub fn start_game(&mut self) {
        if self.phase != GamePhase::ReadyToPlay {
            return;
        }
        self.phase = GamePhase::GameActive;
        self.spawn_player();
        log::info!(
            "Game started ({} controls, {}x{} arena)",
            self.config.control_mode.as_str(),
            self.arena.x,
            self.arena.y
        );
    }

    /// Back to a fresh session. Keeps configuration and the leaderboard.
    pub fn reset_game(&mut self) {
        self.timers.cancel_all();
        self.clear_arena(false);
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.rebuild_lives_display();
        self.level = 1;
        self.show_level_banner = false;
        self.phase = GamePhase::ReadyToPlay;
        self.prev_input = TickInput::default();
    }

    pub fn restart_game(&mut self) {
        self.reset_game();
        self.start_game();
    }

    /// Record the finished game under `name`.
    ///
    /// Only valid during name entry; returns the 1-based leaderboard rank.
    pub fn submit_name(&mut self, name: &str) -> Option<usize> {
        if self.phase != GamePhase::EnterName {
            return None;
        }
        let rank = self
            .high_scores
            .add_score(name, self.score, self.config.max_name_length);
        self.high_score = self.high_scores.best_with(self.score);
        self.phase = GamePhase::ShowScores;
        Some(rank)
    }

    pub fn leaderboard_lines(&self) -> Vec<String> {
        self.high_scores.leaderboard_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::GameConfig;
    use crate::sim::state::{Obstacle, ObstacleSize};
    use glam::Vec2;

    /// Random spawning effectively disabled
    fn quiet_config() -> GameConfig {
        GameConfig {
            obstacle_spawn_odds: u32::MAX,
            enemy_spawn_odds: u32::MAX,
            ..Default::default()
        }
    }

    fn started(config: GameConfig) -> GameState {
        let mut state = GameState::with_seed(config, 12345).expect("valid config");
        state.resize(100.0, 100.0);
        state.start_game();
        state
    }

    fn inject_obstacle(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        let config = state.config.clone();
        state.obstacles.push(Obstacle::new(
            id,
            ObstacleSize::Large,
            pos,
            Vec2::ZERO,
            1.0,
            &config,
        ));
    }

    fn idle(state: &mut GameState) -> TickReport {
        tick(state, &TickInput::default(), SIM_DT)
    }

    #[test]
    fn test_ready_state_does_not_simulate() {
        let mut state = GameState::with_seed(GameConfig::default(), 1).expect("valid config");
        state.resize(100.0, 100.0);
        for _ in 0..100 {
            idle(&mut state);
        }
        assert_eq!(state.time_ticks, 0);
        assert!(state.player.is_none());
    }

    #[test]
    fn test_obstacle_at_player_location_kills() {
        let mut state = started(GameConfig::default());
        let center = state.arena_center();
        inject_obstacle(&mut state, center);

        let report = idle(&mut state);
        assert!(state.player.as_ref().is_some_and(|p| p.dead));
        assert_eq!(state.lives, 2);
        assert!(!state.player_debris.is_empty());
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerKilled { lives_left: 2, .. })));
    }

    #[test]
    fn test_fifth_projectile_rejected() {
        let mut state = started(quiet_config());
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..4 {
            tick(&mut state, &fire, SIM_DT);
            idle(&mut state);
        }
        assert_eq!(state.projectiles.len(), 4);
        let faction = state.player_faction().expect("player alive");
        assert!(!state.check_projectile_limit(faction));

        let report = tick(&mut state, &fire, SIM_DT);
        assert_eq!(state.projectiles.len(), 4);
        assert!(report.delta.spawned.is_empty());
    }

    #[test]
    fn test_held_fire_does_not_repeat() {
        let mut state = started(quiet_config());
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        for _ in 0..10 {
            tick(&mut state, &fire, SIM_DT);
        }
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_respawn_after_debris_clears() {
        let mut state = started(quiet_config());
        let first_faction = state.player_faction();
        let center = state.arena_center();
        inject_obstacle(&mut state, center);
        idle(&mut state);
        state.obstacles.clear();

        let mut respawned = false;
        for _ in 0..300 {
            let report = idle(&mut state);
            if report.events.contains(&GameEvent::PlayerRespawned) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert!(state.player_debris.is_empty());
        let player = state.player.as_ref().expect("respawned");
        assert!(!player.dead);
        assert_eq!(player.body.pos, center);
        assert_eq!(player.body.vel, Vec2::ZERO);
        assert_ne!(state.player_faction(), first_faction);
    }

    #[test]
    fn test_warp_round_trip() {
        let mut state = started(quiet_config());
        let warp = TickInput {
            warp: true,
            ..Default::default()
        };
        let report = tick(&mut state, &warp, SIM_DT);
        assert!(report.events.contains(&GameEvent::WarpStarted));
        assert!(state.player.as_ref().is_some_and(|p| !p.is_collidable()));

        for _ in 1..79 {
            idle(&mut state);
        }
        assert!(state.player.as_ref().is_some_and(|p| p.warping));

        let report = idle(&mut state);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::WarpEnded { .. })));
        let player = state.player.as_ref().expect("player");
        assert!(player.is_collidable());
        assert_eq!(player.warp_countdown, state.config.warp_interval);
        assert!((0.0..=100.0).contains(&player.body.pos.x));
        assert!((0.0..=100.0).contains(&player.body.pos.y));
    }

    #[test]
    fn test_level_clear_advances_and_shows_banner() {
        let mut state = started(quiet_config());
        state.starting_obstacles_spawned = state.config.max_large_obstacles;
        state.score = 500;

        let report = idle(&mut state);
        assert!(report.events.contains(&GameEvent::LevelCleared { level: 1 }));
        assert_eq!(state.level, 2);
        assert!(state.show_level_banner);
        assert_eq!(state.starting_obstacles_spawned, 0);
        assert_eq!(state.score, 500);
        assert!(state.player_alive());

        tick(&mut state, &TickInput::default(), 2.0);
        assert!(!state.show_level_banner);
    }

    #[test]
    fn test_game_over_to_scores_and_restart() {
        let mut state = started(quiet_config());
        state.lives = 1;
        state.score = 1200;
        let center = state.arena_center();
        inject_obstacle(&mut state, center);

        let report = idle(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(report.events.contains(&GameEvent::GameOver { score: 1200 }));

        // Debris still animates while waiting for name entry
        let before = state.player_debris.len();
        idle(&mut state);
        assert!(state.player_debris.len() < before);

        let mut entered = false;
        for _ in 0..4 {
            let report = tick(&mut state, &TickInput::default(), 0.5);
            entered |= report.events.contains(&GameEvent::EnterName);
        }
        assert!(entered);
        assert_eq!(state.phase, GamePhase::EnterName);
        assert!(state.obstacles.is_empty());
        assert!(state.player_debris.is_empty());
        assert_eq!(state.high_score, 1200);

        assert_eq!(state.submit_name("ab"), Some(1));
        assert_eq!(state.phase, GamePhase::ShowScores);
        assert_eq!(state.leaderboard_lines(), vec!["1. ab   1200".to_string()]);
        assert_eq!(state.submit_name("again"), None);

        state.restart_game();
        assert_eq!(state.phase, GamePhase::GameActive);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert!(state.player_alive());
        assert_eq!(state.high_scores.len(), 1);
    }

    #[test]
    fn test_reset_after_game_over_clears_everything() {
        let mut state = started(GameConfig::default());
        state.lives = 1;
        state.score = 77;
        let center = state.arena_center();
        inject_obstacle(&mut state, center);
        idle(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.reset_game();
        assert!(state.player.is_none());
        assert!(state.projectiles.is_empty());
        assert!(state.enemies.is_empty());
        assert!(state.obstacles.is_empty());
        assert!(state.player_debris.is_empty());
        assert!(state.ellipse_debris.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, state.config.starting_lives);
        assert_eq!(state.lives_display.chars().count(), 3);
        assert_eq!(state.obstacles_destroyed, 0);
        assert_eq!(state.starting_obstacles_spawned, 0);

        // The pending name-entry timer died with the old session
        tick(&mut state, &TickInput::default(), 5.0);
        assert_eq!(state.phase, GamePhase::ReadyToPlay);
    }

    #[test]
    fn test_obstacles_populate_level() {
        let mut state = started(GameConfig {
            obstacle_spawn_odds: 1,
            enemy_spawn_odds: u32::MAX,
            ..Default::default()
        });
        state.resize(800.0, 600.0);
        for _ in 0..10 {
            idle(&mut state);
        }
        assert_eq!(state.starting_obstacles_spawned, 4);
        assert_eq!(state.obstacles.len(), 4);
    }
}
