#![allow(dead_code)]

use std::time::Duration;

use glam::{IVec2, Vec2};
use pacman_ai::config::{GameConfig, ModePhase};
use pacman_ai::constants::RAW_BOARD;
use pacman_ai::entity::ghost::{Ghost, GhostContext, GhostMode, GhostStep};
use pacman_ai::entity::player::PlayerSnapshot;
use pacman_ai::events::GameEvent;
use pacman_ai::game::Game;
use pacman_ai::map::grid::MazeGrid;
use pacman_ai::systems::ghost::GhostCoordinator;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub const SEED: u64 = 7;
/// A step that divides every reference timing evenly.
pub const STEP: Duration = Duration::from_millis(10);

pub fn grid() -> MazeGrid {
    MazeGrid::new(&RAW_BOARD).expect("standard board should build")
}

pub fn config() -> GameConfig {
    GameConfig::default().with_seed(SEED)
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(SEED)
}

pub fn game() -> Game {
    Game::new(config()).expect("standard game should build")
}

pub fn center(x: i32, y: i32) -> Vec2 {
    MazeGrid::tile_center(IVec2::new(x, y))
}

pub fn snapshot(position: Vec2, velocity: Vec2) -> PlayerSnapshot {
    PlayerSnapshot {
        position,
        velocity,
        aligned: true,
    }
}

/// A coordinator that has been started, plus the events the start emitted.
pub fn started_coordinator() -> (GhostCoordinator, Vec<GameEvent>) {
    let mut coordinator = GhostCoordinator::new(&config());
    let mut events = Vec::new();
    coordinator.start(&mut events);
    (coordinator, events)
}

/// Runs the coordinator for `duration` in [`STEP`] increments without a player.
pub fn advance(coordinator: &mut GhostCoordinator, grid: &MazeGrid, duration: Duration) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let steps = duration.as_millis() / STEP.as_millis();
    for _ in 0..steps {
        coordinator.update(STEP, None, grid, &mut events);
    }
    events
}

/// Updates a lone ghost once with a 60 Hz step, under a Scatter schedule.
pub fn step_ghost(ghost: &mut Ghost, grid: &MazeGrid, player: Option<&PlayerSnapshot>, rng: &mut SmallRng) -> GhostStep {
    step_ghost_with_chance(ghost, grid, player, 0.2, rng)
}

/// Like [`step_ghost`], with an explicit chance for random turns.
pub fn step_ghost_with_chance(
    ghost: &mut Ghost,
    grid: &MazeGrid,
    player: Option<&PlayerSnapshot>,
    random_turn_chance: f64,
    rng: &mut SmallRng,
) -> GhostStep {
    let ctx = GhostContext {
        grid,
        player,
        partner: None,
        now: Duration::ZERO,
        dt: Duration::from_secs(1) / 60,
        random_turn_chance,
        schedule_mode: GhostMode::Scatter,
    };
    ghost.update(&ctx, rng)
}

/// A configuration whose schedule is a single indefinite Chase phase.
pub fn chase_only_config() -> GameConfig {
    GameConfig {
        mode_schedule: vec![ModePhase {
            mode: GhostMode::Chase,
            duration: None,
        }],
        ..config()
    }
}

/// Ticks the game `count` times at 60 Hz, returning every event emitted.
pub fn tick_game(game: &mut Game, count: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..count {
        game.tick(Duration::from_secs(1) / 60);
        events.extend(game.drain_events());
    }
    events
}
