//! This module contains all the constants used by the simulation core.

use std::time::Duration;

use glam::{IVec2, UVec2, Vec2};

/// The size of each tile, in simulation units.
pub const TILE_SIZE: f32 = 32.0;
/// The size of the game board, in tiles.
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 31);
/// The size of the game board, in simulation units.
pub const BOARD_PIXEL_SIZE: Vec2 = Vec2::new(BOARD_CELL_SIZE.x as f32 * TILE_SIZE, BOARD_CELL_SIZE.y as f32 * TILE_SIZE);

/// The nominal simulation step (60 ticks per second).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Movement speeds, in simulation units per second.
pub mod speed {
    pub const GHOST_NORMAL: f32 = 150.0;
    pub const GHOST_FRIGHTENED: f32 = 75.0;
    pub const GHOST_EATEN: f32 = 200.0;
    pub const PLAYER: f32 = 160.0;
}

/// Point values awarded by the core.
pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 50;
    /// Points for the first ghost eaten in a frightened period; doubles for each subsequent one.
    pub const GHOST_BASE: u32 = 200;
}

/// Timer durations driving the coordinator.
pub mod timing {
    use std::time::Duration;

    use crate::entity::ghost::GhostMode;

    /// The global scatter/chase pattern. `None` marks the final, indefinite phase.
    pub const MODE_PATTERN: [(GhostMode, Option<Duration>); 8] = [
        (GhostMode::Scatter, Some(Duration::from_millis(7_000))),
        (GhostMode::Chase, Some(Duration::from_millis(20_000))),
        (GhostMode::Scatter, Some(Duration::from_millis(7_000))),
        (GhostMode::Chase, Some(Duration::from_millis(20_000))),
        (GhostMode::Scatter, Some(Duration::from_millis(5_000))),
        (GhostMode::Chase, Some(Duration::from_millis(20_000))),
        (GhostMode::Scatter, Some(Duration::from_millis(5_000))),
        (GhostMode::Chase, None),
    ];

    pub const FRIGHTENED_DURATION: Duration = Duration::from_millis(8_000);
    /// The tail end of the frightened period during which ghosts flash.
    pub const FRIGHTENED_WARNING: Duration = Duration::from_millis(2_000);
    pub const FRIGHTENED_FLASH_INTERVAL: Duration = Duration::from_millis(250);

    /// Offsets from (re)start at which each ghost leaves the house, in Blinky, Pinky, Inky, Clyde order.
    pub const RELEASE_DELAYS: [Duration; 4] = [
        Duration::ZERO,
        Duration::from_millis(3_500),
        Duration::from_millis(6_500),
        Duration::from_millis(9_500),
    ];
    /// Extra delay before the release schedule starts after a reset.
    pub const RESET_RELEASE_DELAY: Duration = Duration::from_millis(1_000);

    /// Duration of one full up-and-down cycle of the in-house bob.
    pub const HOUSE_BOB_CYCLE: Duration = Duration::from_millis(2_000);
}

/// Tolerances and distances, in tiles.
pub mod motion {
    /// Maximum offset from a tile center still considered centered.
    pub const CENTERING_TOLERANCE: f32 = 0.15;
    /// Distance from an impassable boundary at which the player snaps to the tile center and stops.
    pub const STOP_DISTANCE: f32 = 0.4;
    /// Center-to-center distance below which the player and a ghost overlap.
    pub const COLLISION_DISTANCE: f32 = 0.8;
    /// Amplitude of the in-house bob.
    pub const HOUSE_BOB_AMPLITUDE: f32 = 0.5;
}

/// Parameters of the ghost personalities, in tiles unless noted.
pub mod targeting {
    pub const PINKY_LOOKAHEAD: f32 = 4.0;
    pub const INKY_LOOKAHEAD: f32 = 2.0;
    pub const CLYDE_FLEE_RADIUS: f32 = 8.0;
    /// Probability that Clyde ignores its target and turns randomly at an intersection.
    pub const CLYDE_RANDOM_TURN_CHANCE: f64 = 0.2;
}

/// Starting tiles of the ghosts, in Blinky, Pinky, Inky, Clyde order.
pub const GHOST_START_TILES: [IVec2; 4] = [IVec2::new(13, 13), IVec2::new(13, 14), IVec2::new(11, 14), IVec2::new(16, 14)];

/// Scatter corners of the ghosts (in simulation units), in Blinky, Pinky, Inky, Clyde order.
pub const SCATTER_CORNERS: [Vec2; 4] = [
    Vec2::new(27.0 * TILE_SIZE, 0.0),
    Vec2::new(0.0, 0.0),
    Vec2::new(27.0 * TILE_SIZE, 30.0 * TILE_SIZE),
    Vec2::new(0.0, 30.0 * TILE_SIZE),
];

/// The raw layout of the game board, as a 2D array of characters.
///
/// `#` wall, `.` pellet, ` ` empty path, `o` power pellet, `T` teleport, `=` house door,
/// `H` house interior, `0` player start.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #HHHHHH# ##.######",
    "T     .   #HHHHHH#   .     T",
    "######.## #HHHHHH# ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......0 .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
