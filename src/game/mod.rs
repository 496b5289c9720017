//! This module contains the top-level simulation state.

use std::time::Duration;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::constants::RAW_BOARD;
use crate::entity::ghost::GhostType;
use crate::entity::player::PlayerMotion;
use crate::error::{GameResult, MapError};
use crate::events::{EventQueue, GameEvent};
use crate::map::direction::Direction;
use crate::map::grid::{MazeGrid, TraversalFlags};
use crate::systems::ghost::{CollisionReport, GhostCoordinator};
use crate::systems::item::{PelletField, PelletKind};

/// What happened during one [`Game::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickOutcome {
    pub pellet: Option<PelletKind>,
    pub collisions: CollisionReport,
}

/// The `Game` struct is the main entry point for the simulation.
///
/// It owns the maze, the player, the pellets and the ghosts, and fixes the order in which they
/// are updated each tick. Everything it wants the host to know ends up in its event queue.
pub struct Game {
    grid: MazeGrid,
    player: PlayerMotion,
    pellets: PelletField,
    ghosts: GhostCoordinator,
    events: EventQueue,
    paused: bool,
}

impl Game {
    /// Creates a game on the standard board.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        Self::with_board(config, &RAW_BOARD)
    }

    /// Creates a game on a custom board. The ghosts' starting tiles must be ghost-accessible on it.
    pub fn with_board(config: GameConfig, raw_board: &[&str]) -> GameResult<Game> {
        config.validate()?;
        let grid = MazeGrid::new(raw_board)?;

        for ghost_type in GhostType::ALL {
            let tile = ghost_type.start_tile();
            if !grid.is_walkable(tile, TraversalFlags::GHOST | TraversalFlags::HOUSE) {
                return Err(MapError::InvalidConfig(format!("{} cannot start on {tile}", ghost_type.as_str())).into());
            }
        }

        let mut events = EventQueue::new();
        let player = PlayerMotion::new(&grid, &config);
        let pellets = PelletField::new(&grid);
        let mut ghosts = GhostCoordinator::new(&config);
        ghosts.start(&mut events);

        info!(
            pellets = pellets.remaining_count(),
            seed = ?config.rng_seed,
            "Game initialized"
        );

        Ok(Game {
            grid,
            player,
            pellets,
            ghosts,
            events,
            paused: false,
        })
    }

    /// Advances the simulation by `dt`.
    ///
    /// Order: player motion, pellet collection (a power pellet starts a frightened period), ghost
    /// timers and movement, then player-ghost collisions.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        if self.paused {
            return TickOutcome::default();
        }

        self.player.update(dt, &self.grid, &mut self.events);

        let pellet = self.pellets.collect_at(self.player.position(), &mut self.events);
        if pellet == Some(PelletKind::Power) {
            self.ghosts.on_power_pellet();
        }

        let snapshot = self.player.snapshot();
        self.ghosts.update(dt, Some(&snapshot), &self.grid, &mut self.events);

        let collisions = self.ghosts.handle_collisions(self.player.position(), &mut self.events);

        TickOutcome { pellet, collisions }
    }

    /// Queues a direction for the player; it is applied as soon as the turn is legal.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.player.queue_direction(direction);
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.ghosts.pause();
            debug!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.ghosts.resume(&mut self.events);
            debug!("Game resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Puts the player and the ghosts back at their starts. Pellets and score are kept.
    pub fn reset_after_death(&mut self) {
        self.paused = false;
        self.player.reset();
        self.ghosts.reset(&mut self.events);
        info!(score = self.score(), "Positions reset after death");
    }

    /// Starts the level over: every pellet is restored and the score is zeroed.
    pub fn restart_level(&mut self) {
        self.pellets.reset();
        self.ghosts.clear_points();
        self.reset_after_death();
        info!("Level restarted");
    }

    /// Removes and returns every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain()
    }

    /// Pellet points plus ghost points.
    pub fn score(&self) -> u32 {
        self.pellets.score() + self.ghosts.ghost_points()
    }

    pub fn remaining_pellets(&self) -> usize {
        self.pellets.remaining_count()
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    pub fn player(&self) -> &PlayerMotion {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerMotion {
        &mut self.player
    }

    pub fn pellets(&self) -> &PelletField {
        &self.pellets
    }

    pub fn ghosts(&self) -> &GhostCoordinator {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut GhostCoordinator {
        &mut self.ghosts
    }
}
