//! Read-only views for the presentation layer
//!
//! The renderer pulls a snapshot after each tick and applies the
//! spawned/removed delta returned by [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, EntityId, Faction, GamePhase, GameState, ObstacleSize};

/// Visual category of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Projectile,
    Enemy(EnemyKind),
    Obstacle(ObstacleSize),
    PlayerDebris,
    EllipseDebris,
}

/// Position/rotation record for one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    /// Degrees
    pub rotation: f32,
    pub size: f32,
    pub visible: bool,
}

/// Entities created and destroyed during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameDelta {
    pub spawned: Vec<EntityId>,
    pub removed: Vec<EntityId>,
}

impl FrameDelta {
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty() && self.removed.is_empty()
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired { faction: Faction },
    ObstacleDestroyed { size: ObstacleSize, pos: Vec2, scored: bool },
    EnemyDestroyed { kind: EnemyKind, pos: Vec2, scored: bool },
    PlayerKilled { pos: Vec2, lives_left: u32 },
    PlayerRespawned,
    WarpStarted,
    WarpEnded { pos: Vec2 },
    LevelCleared { level: u32 },
    GameOver { score: u64 },
    EnterName,
}

/// Everything a host needs after one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    pub delta: FrameDelta,
}

/// Values a HUD binds to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudState {
    pub phase: GamePhase,
    pub score: u64,
    pub high_score: u64,
    pub lives: u32,
    pub lives_display: String,
    pub level: u32,
    pub show_level_banner: bool,
}

impl GameState {
    /// Every entity, player first
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        let mut out = Vec::with_capacity(
            1 + self.projectiles.len()
                + self.enemies.len()
                + self.obstacles.len()
                + self.player_debris.len()
                + self.ellipse_debris.len(),
        );

        if let Some(player) = self.player.as_ref().filter(|p| !p.dead) {
            out.push(EntitySnapshot {
                id: player.body.id,
                kind: EntityKind::Player,
                position: player.body.pos,
                rotation: player.rotation,
                size: player.body.size,
                visible: !player.warping,
            });
        }
        out.extend(self.obstacles.iter().map(|o| EntitySnapshot {
            id: o.body.id,
            kind: EntityKind::Obstacle(o.class),
            position: o.body.pos,
            rotation: o.rotation,
            size: o.body.size,
            visible: true,
        }));
        out.extend(self.enemies.iter().map(|e| EntitySnapshot {
            id: e.body.id,
            kind: EntityKind::Enemy(e.kind),
            position: e.body.pos,
            rotation: 0.0,
            size: e.body.size,
            visible: true,
        }));
        out.extend(self.projectiles.iter().map(|p| EntitySnapshot {
            id: p.body.id,
            kind: EntityKind::Projectile,
            position: p.body.pos,
            rotation: p.rotation,
            size: p.body.size,
            visible: true,
        }));
        out.extend(self.player_debris.iter().map(|d| EntitySnapshot {
            id: d.body.id,
            kind: EntityKind::PlayerDebris,
            position: d.body.pos,
            rotation: d.rotation,
            size: d.body.size,
            visible: true,
        }));
        out.extend(self.ellipse_debris.iter().map(|d| EntitySnapshot {
            id: d.body.id,
            kind: EntityKind::EllipseDebris,
            position: d.body.pos,
            rotation: 0.0,
            size: d.body.size,
            visible: true,
        }));

        out
    }

    pub fn hud(&self) -> HudState {
        HudState {
            phase: self.phase,
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            lives_display: self.lives_display.clone(),
            level: self.level,
            show_level_banner: self.show_level_banner,
        }
    }

    /// Drain the events and delta accumulated since the last report
    pub(crate) fn take_report(&mut self) -> TickReport {
        TickReport {
            events: std::mem::take(&mut self.events),
            delta: std::mem::take(&mut self.delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameConfig;

    #[test]
    fn test_snapshot_player_first_and_warp_hidden() {
        let mut state = GameState::with_seed(GameConfig::default(), 5).expect("valid config");
        state.resize(200.0, 100.0);
        state.spawn_player();
        state.fire_player_projectile();

        let snap = state.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].kind, EntityKind::Player);
        assert_eq!(snap[0].position, Vec2::new(100.0, 50.0));
        assert!(snap[0].visible);
        assert_eq!(snap[1].kind, EntityKind::Projectile);

        if let Some(p) = state.player.as_mut() {
            p.warping = true;
        }
        assert!(!state.snapshot()[0].visible);
    }

    #[test]
    fn test_take_report_drains() {
        let mut state = GameState::with_seed(GameConfig::default(), 5).expect("valid config");
        state.spawn_player();
        let report = state.take_report();
        assert_eq!(report.delta.spawned.len(), 1);
        assert!(state.take_report().delta.is_empty());
    }
}
