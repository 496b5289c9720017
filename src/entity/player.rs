//! Grid-aligned player movement driven by directional input.

use std::time::Duration;

use glam::{IVec2, Vec2};
use tracing::{debug, trace};

use crate::config::GameConfig;
use crate::constants::TILE_SIZE;
use crate::events::{EventSink, GameEvent};
use crate::map::direction::Direction;
use crate::map::grid::{MazeGrid, TraversalFlags};

/// The longest distance the player covers between two turn/teleport/wall checks, in tiles.
const MAX_SUBSTEP: f32 = 0.25;

/// What the ghosts get to see of the player on a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Whether the player sits within the centering tolerance of its tile center.
    pub aligned: bool,
}

/// One end of a tunnel. `outward` is the direction that carries the player off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportZone {
    pub tile: IVec2,
    pub outward: Direction,
}

/// A pair of linked teleport zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeleportPair {
    zones: [TeleportZone; 2],
}

impl TeleportPair {
    /// Links two tunnel tiles. A zone on the left edge leads out to the left, anything else to the right.
    pub fn new(ends: [IVec2; 2]) -> Self {
        let zone = |tile: IVec2| TeleportZone {
            tile,
            outward: if tile.x == 0 { Direction::Left } else { Direction::Right },
        };
        Self {
            zones: [zone(ends[0]), zone(ends[1])],
        }
    }

    pub fn zones(&self) -> [TeleportZone; 2] {
        self.zones
    }

    /// Returns the zone containing `tile` together with its partner.
    fn lookup(&self, tile: IVec2) -> Option<(TeleportZone, TeleportZone)> {
        let [a, b] = self.zones;
        if a.tile == tile {
            Some((a, b))
        } else if b.tile == tile {
            Some((b, a))
        } else {
            None
        }
    }
}

/// The player's movement state.
#[derive(Debug, Clone)]
pub struct PlayerMotion {
    position: Vec2,
    direction: Option<Direction>,
    next_direction: Option<Direction>,
    speed: f32,
    start_tile: IVec2,
    teleports: Option<TeleportPair>,
    is_teleporting: bool,
    /// In simulation units.
    centering_tolerance: f32,
    /// In simulation units.
    stop_distance: f32,
}

impl PlayerMotion {
    pub fn new(grid: &MazeGrid, config: &GameConfig) -> Self {
        Self {
            position: MazeGrid::tile_center(grid.player_start()),
            direction: None,
            next_direction: None,
            speed: config.speeds.player,
            start_tile: grid.player_start(),
            teleports: grid.tunnel_ends().map(TeleportPair::new),
            is_teleporting: false,
            centering_tolerance: config.centering_tolerance * TILE_SIZE,
            stop_distance: config.stop_distance * TILE_SIZE,
        }
    }

    /// Puts the player back on its starting tile, stopped.
    pub fn reset(&mut self) {
        self.position = MazeGrid::tile_center(self.start_tile);
        self.direction = None;
        self.next_direction = None;
        self.is_teleporting = false;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn tile(&self) -> IVec2 {
        MazeGrid::tile_of(self.position)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Forces the current direction, bypassing the turn gate.
    pub fn set_direction(&mut self, direction: Option<Direction>) {
        self.direction = direction;
    }

    pub fn next_direction(&self) -> Option<Direction> {
        self.next_direction
    }

    pub fn velocity(&self) -> Vec2 {
        self.direction.map_or(Vec2::ZERO, |dir| dir.as_vec2() * self.speed)
    }

    pub fn is_teleporting(&self) -> bool {
        self.is_teleporting
    }

    pub fn teleports(&self) -> Option<TeleportPair> {
        self.teleports
    }

    pub fn is_aligned(&self) -> bool {
        let offset = self.position - MazeGrid::tile_center(self.tile());
        offset.x.abs() <= self.centering_tolerance && offset.y.abs() <= self.centering_tolerance
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            velocity: self.velocity(),
            aligned: self.is_aligned(),
        }
    }

    /// Queues a direction; it is committed as soon as the turn is legal.
    pub fn queue_direction(&mut self, direction: Direction) {
        self.next_direction = Some(direction);
    }

    /// Advances the player by `dt`.
    pub fn update(&mut self, dt: Duration, grid: &MazeGrid, events: &mut impl EventSink) {
        let mut remaining = self.speed * dt.as_secs_f32();

        // A stationary player still needs a chance to start moving
        loop {
            self.try_turn(grid);

            let Some(direction) = self.direction else {
                break;
            };
            if remaining <= 0.0 {
                break;
            }

            let step = remaining.min(MAX_SUBSTEP * TILE_SIZE);
            remaining -= step;
            self.position += direction.as_vec2() * step;

            self.check_teleport(direction, events);
            self.check_wall(direction, grid);
        }
    }

    /// Commits the queued direction if the player may turn into it right now.
    fn try_turn(&mut self, grid: &MazeGrid) {
        let Some(next) = self.next_direction else {
            return;
        };

        match self.direction {
            Some(current) if current == next => {
                self.next_direction = None;
            }
            Some(current) if current.opposite() == next => {
                trace!(from = ?current, to = ?next, "Player reversed");
                self.direction = Some(next);
                self.next_direction = None;
            }
            _ => {
                let tile = self.tile();
                if self.is_aligned() && grid.is_walkable(tile + next.as_ivec2(), TraversalFlags::PACMAN) {
                    self.position = MazeGrid::tile_center(tile);
                    self.direction = Some(next);
                    self.next_direction = None;
                }
            }
        }
    }

    fn check_teleport(&mut self, direction: Direction, events: &mut impl EventSink) {
        let Some(pair) = self.teleports else {
            return;
        };

        let Some((zone, partner)) = pair.lookup(self.tile()) else {
            self.is_teleporting = false;
            return;
        };

        if self.is_teleporting || zone.outward != direction {
            return;
        }

        let from = self.position;
        let to = MazeGrid::tile_center(partner.tile + direction.as_ivec2());
        self.position = to;
        self.is_teleporting = true;

        debug!(from = %from, to = %to, direction = ?direction, "Player teleported");
        events.emit(GameEvent::PlayerTeleported { from, to });
    }

    /// Stops the player on its tile center once it comes too close to a boundary it cannot cross.
    fn check_wall(&mut self, direction: Direction, grid: &MazeGrid) {
        let tile = self.tile();
        if grid.is_walkable(tile + direction.as_ivec2(), TraversalFlags::PACMAN) {
            return;
        }

        let center = MazeGrid::tile_center(tile);
        let advanced = (self.position - center).dot(direction.as_vec2());
        if TILE_SIZE / 2.0 - advanced <= self.stop_distance {
            trace!(tile = %tile, direction = ?direction, "Player stopped at wall");
            self.position = center;
            self.direction = None;
        }
    }
}
