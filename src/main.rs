//! Symbol Blaster native driver
//!
//! Runs a headless session at a fixed 60 Hz timestep with a simple autopilot
//! at the controls, logging gameplay events as they happen.
//!
//! Usage: `symbol-blaster [config.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;

    use glam::Vec2;
    use symbol_blaster::consts::SIM_DT;
    use symbol_blaster::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use symbol_blaster::{ControlMode, GameConfig, degrees_toward, normalize_degrees};

    const ARENA_WIDTH: f32 = 800.0;
    const ARENA_HEIGHT: f32 = 600.0;
    const DEFAULT_SECONDS: f32 = 120.0;
    /// Degrees of aim error the autopilot tolerates before turning
    const AIM_TOLERANCE: f32 = 4.0;
    /// Warp out when anything gets this close
    const PANIC_DISTANCE: f32 = 48.0;

    /// Aims at the nearest obstacle or enemy and shoots
    #[derive(Debug, Default)]
    struct Autopilot {
        frame: u64,
    }

    impl Autopilot {
        fn next_input(&mut self, state: &GameState) -> TickInput {
            self.frame += 1;
            let mut input = TickInput::default();
            let Some(player) = state.player.as_ref().filter(|p| !p.dead && !p.warping) else {
                return input;
            };
            let pos = player.body.pos;

            let Some(target) = state
                .obstacles
                .iter()
                .map(|o| o.body.pos)
                .chain(state.enemies.iter().map(|e| e.body.pos))
                .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)))
            else {
                return input;
            };

            // Alternate frames so fire and warp register as fresh presses
            let press = self.frame % 2 == 0;
            let aim_error = match state.config.control_mode {
                ControlMode::Retro => Self::steer_retro(&mut input, player.rotation, pos, target),
                ControlMode::Directional => Self::steer_directional(&mut input, pos, target),
            };
            input.fire = press && aim_error.abs() < 20.0;
            input.warp = press && target.distance(pos) < PANIC_DISTANCE;
            input
        }

        /// Turn the nose toward `target`, returning the remaining aim error
        fn steer_retro(input: &mut TickInput, rotation: f32, pos: Vec2, target: Vec2) -> f32 {
            let desired = normalize_degrees(degrees_toward(pos, target) + 90.0);
            let error = normalize_degrees(desired - rotation + 180.0) - 180.0;
            if error > AIM_TOLERANCE {
                input.right = true;
            } else if error < -AIM_TOLERANCE {
                input.left = true;
            }
            error
        }

        /// Hold the keys pointing toward `target`; only 8 headings exist
        fn steer_directional(input: &mut TickInput, pos: Vec2, target: Vec2) -> f32 {
            let delta = target - pos;
            input.left = delta.x < -AIM_TOLERANCE;
            input.right = delta.x > AIM_TOLERANCE;
            input.up = delta.y < -AIM_TOLERANCE;
            input.down = delta.y > AIM_TOLERANCE;
            0.0
        }
    }

    fn load_config(path: Option<&str>) -> Result<GameConfig, String> {
        let Some(path) = path else {
            return Ok(GameConfig::default());
        };
        let json = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {}", path, e))?;
        GameConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))
    }

    fn log_event(event: &GameEvent, state: &GameState) {
        match event {
            GameEvent::PlayerKilled { lives_left, .. } => {
                log::info!("Ship lost, {} lives left", lives_left)
            }
            GameEvent::PlayerRespawned => log::info!("Ship respawned"),
            GameEvent::LevelCleared { level } => {
                log::info!("Level {} cleared at score {}", level, state.score)
            }
            GameEvent::GameOver { score } => log::info!("Game over, final score {}", score),
            GameEvent::WarpStarted | GameEvent::WarpEnded { .. } => log::debug!("{:?}", event),
            GameEvent::EnemyDestroyed { kind, scored: true, .. } => {
                log::debug!("{:?} enemy destroyed, score {}", kind, state.score)
            }
            _ => log::trace!("{:?}", event),
        }
    }

    pub fn run() -> ExitCode {
        env_logger::init();

        let args: Vec<String> = std::env::args().skip(1).collect();
        let config = match load_config(args.first().map(String::as_str)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let seconds = args
            .get(1)
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_SECONDS);

        let mut state = match GameState::new(config) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };
        state.resize(ARENA_WIDTH, ARENA_HEIGHT);
        state.start_game();
        log::info!("Symbol Blaster (headless) running for {:.0}s", seconds);

        let mut autopilot = Autopilot::default();
        let mut games = 1u32;
        let frames = (seconds / SIM_DT).round() as u64;

        for _ in 0..frames {
            let input = autopilot.next_input(&state);
            let report = tick(&mut state, &input, SIM_DT);
            for event in &report.events {
                log_event(event, &state);
            }

            match state.phase {
                GamePhase::EnterName => {
                    if let Some(rank) = state.submit_name(&format!("AP{}", games)) {
                        log::info!("Recorded game {} at rank {}", games, rank);
                    }
                }
                GamePhase::ShowScores => {
                    state.restart_game();
                    games += 1;
                }
                _ => {}
            }
        }

        let hud = state.hud();
        println!(
            "{} game(s), level {}, score {}, lives {}",
            games, hud.level, hud.score, hud.lives_display
        );
        for line in state.leaderboard_lines() {
            println!("{}", line);
        }
        ExitCode::SUCCESS
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is embedded by a host on this target
}
