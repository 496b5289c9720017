//! The read-only maze oracle consulted by every moving entity.

use bitflags::bitflags;
use glam::{IVec2, UVec2, Vec2};
use pathfinding::prelude::bfs_reach;
use tracing::debug;

use crate::constants::TILE_SIZE;
use crate::error::{GameResult, MapError};
use crate::map::direction::Direction;
use crate::map::parser::{MapTileParser, Tile};

bitflags! {
    /// Describes who is asking whether a tile can be entered.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TraversalFlags: u8 {
        const PACMAN = 1 << 0;
        const GHOST = 1 << 1;
        /// The querying ghost is currently allowed inside the ghost house.
        const HOUSE = 1 << 2;
    }
}

/// The static tile grid, plus the special positions discovered while parsing it.
#[derive(Debug, Clone)]
pub struct MazeGrid {
    size: UVec2,
    tiles: Vec<Tile>,
    pellets: Vec<IVec2>,
    power_pellets: Vec<IVec2>,
    house_door: [IVec2; 2],
    tunnel_ends: Option<[IVec2; 2]>,
    player_start: IVec2,
}

impl MazeGrid {
    /// Builds a grid from a raw board layout.
    ///
    /// # Errors
    ///
    /// Fails if the layout does not parse, or if the house exit or a teleport zone cannot be
    /// reached from the player's starting tile.
    pub fn new(raw_board: &[&str]) -> GameResult<MazeGrid> {
        let parsed = MapTileParser::parse_board(raw_board)?;

        let grid = MazeGrid {
            size: parsed.size,
            tiles: parsed.tiles,
            pellets: parsed.pellets,
            power_pellets: parsed.power_pellets,
            house_door: parsed.house_door,
            tunnel_ends: parsed.tunnel_ends,
            player_start: parsed.player_start,
        };

        let reachable: Vec<IVec2> = bfs_reach(grid.player_start, |&tile| {
            Direction::DECISION_ORDER
                .into_iter()
                .map(move |dir| tile + dir.as_ivec2())
                .filter(|&next| grid.is_walkable(next, TraversalFlags::PACMAN))
                .collect::<Vec<_>>()
        })
        .collect();

        let exit = grid.house_exit_tile();
        if !reachable.contains(&exit) {
            return Err(MapError::InvalidConfig(format!("House exit {exit} is unreachable from the player start")).into());
        }
        if let Some(ends) = grid.tunnel_ends {
            if let Some(end) = ends.iter().find(|end| !reachable.contains(end)) {
                return Err(MapError::InvalidConfig(format!("Teleport zone {end} is unreachable from the player start")).into());
            }
        }

        debug!(
            size = %grid.size,
            pellets = grid.pellets.len(),
            power_pellets = grid.power_pellets.len(),
            reachable = reachable.len(),
            "Maze grid built"
        );

        Ok(grid)
    }

    /// The grid dimensions, in tiles.
    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn tile_size(&self) -> f32 {
        TILE_SIZE
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && (tile.x as u32) < self.size.x && (tile.y as u32) < self.size.y
    }

    /// Returns the tile at a grid position; anything out of bounds reads as a wall.
    pub fn tile_at(&self, tile: IVec2) -> Tile {
        if !self.in_bounds(tile) {
            return Tile::Wall;
        }
        self.tiles[(tile.y as u32 * self.size.x + tile.x as u32) as usize]
    }

    /// Whether an entity described by `flags` may occupy the tile.
    ///
    /// Walls and out-of-bounds tiles are never walkable. Ghost-house tiles require a ghost that
    /// currently holds house access; the player can never enter them.
    pub fn is_walkable(&self, tile: IVec2, flags: TraversalFlags) -> bool {
        if !self.in_bounds(tile) {
            return false;
        }
        match self.tile_at(tile) {
            Tile::Wall => false,
            Tile::GhostHouse => flags.contains(TraversalFlags::GHOST | TraversalFlags::HOUSE),
            Tile::Path | Tile::PowerPellet | Tile::Teleport => true,
        }
    }

    pub fn is_house(&self, tile: IVec2) -> bool {
        self.tile_at(tile) == Tile::GhostHouse
    }

    /// The tile containing a position (in simulation units).
    pub fn tile_of(position: Vec2) -> IVec2 {
        (position / TILE_SIZE).floor().as_ivec2()
    }

    /// The center of a tile, in simulation units.
    pub fn tile_center(tile: IVec2) -> Vec2 {
        (tile.as_vec2() + Vec2::splat(0.5)) * TILE_SIZE
    }

    pub fn pellets(&self) -> &[IVec2] {
        &self.pellets
    }

    pub fn power_pellets(&self) -> &[IVec2] {
        &self.power_pellets
    }

    pub fn house_door(&self) -> [IVec2; 2] {
        self.house_door
    }

    /// The tile a ghost must reach to leave the house: directly above the left door tile.
    pub fn house_exit_tile(&self) -> IVec2 {
        self.house_door[0] + Direction::Up.as_ivec2()
    }

    /// The point a housed ghost steers for: centered over the door, one tile above it.
    pub fn house_exit_target(&self) -> Vec2 {
        let [left, right] = self.house_door;
        (Self::tile_center(left) + Self::tile_center(right)) / 2.0 + Direction::Up.as_vec2() * TILE_SIZE
    }

    pub fn tunnel_ends(&self) -> Option<[IVec2; 2]> {
        self.tunnel_ends
    }

    pub fn player_start(&self) -> IVec2 {
        self.player_start
    }
}
