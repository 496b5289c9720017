//! Ghost entity implementation.
//!
//! A ghost is one record parameterized by its [`GhostType`]. The type decides the targeting
//! strategy, the scatter corner and the starting tile; everything else (house rules, direction
//! choice, grid-aligned movement) is shared.

use std::f32::consts::TAU;
use std::time::Duration;

use glam::{IVec2, Vec2};
use pathfinding::prelude::bfs;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::{EnumCount, EnumIter, IntoStaticStr};
use tracing::{debug, trace};

use crate::config::SpeedConfig;
use crate::constants::{motion, targeting, timing, GHOST_START_TILES, SCATTER_CORNERS, TILE_SIZE};
use crate::entity::player::PlayerSnapshot;
use crate::entity::targeting::{compute_target, TargetContext, TargetingStrategy};
use crate::map::direction::Direction;
use crate::map::grid::{MazeGrid, TraversalFlags};

/// Positions closer than this (in simulation units) are considered equal.
const EPSILON: f32 = 1e-3;
/// Upper bound on movement segments processed in one update.
const MAX_SEGMENTS: usize = 16;

/// The four classic ghost types, in update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum GhostType {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostType {
    pub const ALL: [GhostType; 4] = [GhostType::Blinky, GhostType::Pinky, GhostType::Inky, GhostType::Clyde];

    /// Returns the ghost type name, for logging.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Position of this ghost in update order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn strategy(self) -> TargetingStrategy {
        match self {
            GhostType::Blinky => TargetingStrategy::Direct,
            GhostType::Pinky => TargetingStrategy::Ahead {
                tiles: targeting::PINKY_LOOKAHEAD,
            },
            GhostType::Inky => TargetingStrategy::Reflected {
                tiles: targeting::INKY_LOOKAHEAD,
            },
            GhostType::Clyde => TargetingStrategy::ProximityFlee {
                radius: targeting::CLYDE_FLEE_RADIUS,
            },
        }
    }

    pub fn scatter_corner(self) -> Vec2 {
        SCATTER_CORNERS[self.index()]
    }

    pub fn start_tile(self) -> IVec2 {
        GHOST_START_TILES[self.index()]
    }

    /// Whether this ghost sometimes ignores its target and turns at random.
    pub fn turns_randomly(self) -> bool {
        matches!(self, GhostType::Clyde)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostMode {
    Scatter,
    Chase,
    Frightened,
    Eaten,
}

impl GhostMode {
    /// Frightened and Eaten ghosts are exempt from the no-reverse rule.
    pub fn may_reverse(self) -> bool {
        matches!(self, GhostMode::Frightened | GhostMode::Eaten)
    }
}

/// What happened to a ghost during one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostStep {
    /// Still waiting in the house, bobbing in place.
    Housed,
    Moved,
    /// No legal direction; the ghost holds position.
    Stalled,
    /// An eaten ghost reached home and resumed normal play.
    Revived,
}

/// Everything outside the ghost that one update reads.
#[derive(Debug, Clone, Copy)]
pub struct GhostContext<'a> {
    pub grid: &'a MazeGrid,
    pub player: Option<&'a PlayerSnapshot>,
    /// Position of the ghost a reflected-targeting ghost mirrors through.
    pub partner: Option<Vec2>,
    /// The coordinator clock, used by the in-house bob.
    pub now: Duration,
    pub dt: Duration,
    pub random_turn_chance: f64,
    /// The mode the global schedule currently dictates; a revived ghost rejoins it.
    pub schedule_mode: GhostMode,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    pub ghost_type: GhostType,
    position: Vec2,
    direction: Direction,
    velocity: Vec2,
    mode: GhostMode,
    speed: f32,
    speeds: SpeedConfig,
    start_tile: IVec2,
    /// Waiting in the house for its release.
    in_house: bool,
    /// Inside the warning window of a frightened period.
    warning: bool,
    /// Visual flash phase, toggled during the warning window.
    flash: bool,
    /// The tile whose center the current direction was chosen at.
    decided_at: Option<IVec2>,
    target: Vec2,
}

impl Ghost {
    /// Creates a housed ghost on its starting tile.
    pub fn new(ghost_type: GhostType, speeds: SpeedConfig) -> Self {
        let start_tile = ghost_type.start_tile();
        Self {
            ghost_type,
            position: MazeGrid::tile_center(start_tile),
            direction: Direction::Up,
            velocity: Vec2::ZERO,
            mode: GhostMode::Scatter,
            speed: speeds.for_mode(GhostMode::Scatter),
            speeds,
            start_tile,
            in_house: true,
            warning: false,
            flash: false,
            decided_at: None,
            target: ghost_type.scatter_corner(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.decided_at = None;
    }

    pub fn tile(&self) -> IVec2 {
        MazeGrid::tile_of(self.position)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.decided_at = None;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn mode(&self) -> GhostMode {
        self.mode
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn start_tile(&self) -> IVec2 {
        self.start_tile
    }

    pub fn scatter_target(&self) -> Vec2 {
        self.ghost_type.scatter_corner()
    }

    /// The target used at the most recent decision.
    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn is_in_house(&self) -> bool {
        self.in_house
    }

    pub fn is_warning(&self) -> bool {
        self.warning
    }

    pub fn is_flashing(&self) -> bool {
        self.warning && self.flash
    }

    /// Switches mode and adopts the matching speed. Leaving Frightened ends any warning flash.
    pub fn set_mode(&mut self, mode: GhostMode) {
        if mode != GhostMode::Frightened {
            self.warning = false;
            self.flash = false;
        }
        if self.mode != mode {
            trace!(ghost = ?self.ghost_type, from = ?self.mode, to = ?mode, "Ghost mode changed");
        }
        self.mode = mode;
        self.speed = self.speeds.for_mode(mode);
    }

    /// Turns the ghost around on the spot.
    pub fn reverse(&mut self) {
        self.set_direction(self.direction.opposite());
    }

    /// Enters Frightened and reverses. A fresh frightened period also clears any running warning.
    pub fn frighten(&mut self) {
        self.set_mode(GhostMode::Frightened);
        self.warning = false;
        self.flash = false;
        self.reverse();
    }

    pub fn set_warning(&mut self, warning: bool) {
        self.warning = warning;
        self.flash = warning;
    }

    pub fn toggle_flash(&mut self) {
        if self.warning {
            self.flash = !self.flash;
        }
    }

    /// Lets a housed ghost out: it heads up towards the door in the given mode.
    pub fn release(&mut self, mode: GhostMode) {
        self.in_house = false;
        self.set_direction(Direction::Up);
        self.set_mode(mode);
    }

    /// Puts the ghost back on its starting tile, housed, in the given mode.
    pub fn reset(&mut self, mode: GhostMode) {
        self.position = MazeGrid::tile_center(self.start_tile);
        self.velocity = Vec2::ZERO;
        self.in_house = true;
        self.set_direction(Direction::Up);
        self.set_mode(mode);
        self.target = self.scatter_target();
    }

    /// Stops all motion until the next update.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    /// Whether the ghost may step from `tile` in `direction`.
    ///
    /// House tiles are only open to ghosts already inside or Eaten ghosts, and a non-Eaten ghost may
    /// only leave the house moving up.
    pub fn can_step(&self, grid: &MazeGrid, tile: IVec2, direction: Direction) -> bool {
        let next = tile + direction.as_ivec2();
        if !grid.in_bounds(next) {
            return false;
        }

        let inside = grid.is_house(tile);
        let eaten = self.mode == GhostMode::Eaten;

        let mut flags = TraversalFlags::GHOST;
        if inside || eaten {
            flags |= TraversalFlags::HOUSE;
        }
        if !grid.is_walkable(next, flags) {
            return false;
        }

        !(inside && !grid.is_house(next) && !eaten && direction != Direction::Up)
    }

    /// The directions the ghost may take from `tile`, in decision order.
    ///
    /// The reverse of the current direction is left out unless the mode allows reversing.
    pub fn valid_directions(&self, grid: &MazeGrid, tile: IVec2) -> SmallVec<[Direction; 4]> {
        let reverse = self.direction.opposite();
        Direction::DECISION_ORDER
            .into_iter()
            .filter(|&dir| dir != reverse || self.mode.may_reverse())
            .filter(|&dir| self.can_step(grid, tile, dir))
            .collect()
    }

    /// The point the ghost steers towards when standing on `tile`.
    pub fn current_target(&self, ctx: &GhostContext<'_>, tile: IVec2) -> Vec2 {
        if ctx.grid.is_house(tile) && self.mode != GhostMode::Eaten {
            return ctx.grid.house_exit_target();
        }

        compute_target(
            self.ghost_type.strategy(),
            &TargetContext {
                mode: self.mode,
                position: self.position,
                scatter_target: self.scatter_target(),
                home: MazeGrid::tile_center(self.start_tile),
            },
            ctx.player,
            ctx.partner,
        )
    }

    /// Advances the ghost by `ctx.dt`.
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &GhostContext<'_>, rng: &mut R) -> GhostStep {
        if self.in_house {
            self.bob(ctx.now);
            return GhostStep::Housed;
        }

        let mut outcome = GhostStep::Moved;
        let mut distance = self.speed * ctx.dt.as_secs_f32();

        for _ in 0..MAX_SEGMENTS {
            let tile = self.tile();
            let center = MazeGrid::tile_center(tile);
            let heading = self.direction.as_vec2();
            let offset = self.position - center;

            // Drift off the travel axis is removed before anything else
            let lateral = offset - heading * offset.dot(heading);
            if lateral.length() > EPSILON {
                if distance <= 0.0 {
                    break;
                }
                let step = distance.min(lateral.length());
                self.position -= lateral.normalize() * step;
                distance -= step;
                continue;
            }

            let mut ahead = -offset.dot(heading);
            if ahead.abs() <= EPSILON {
                if self.decided_at != Some(tile) {
                    self.position = center;

                    if self.mode == GhostMode::Eaten && tile == self.start_tile {
                        self.revive(ctx.schedule_mode);
                        outcome = GhostStep::Revived;
                    }

                    match self.decide(tile, ctx, rng) {
                        Some(direction) => {
                            self.direction = direction;
                            self.decided_at = Some(tile);
                        }
                        None => {
                            self.velocity = Vec2::ZERO;
                            return match outcome {
                                GhostStep::Revived => GhostStep::Revived,
                                _ => GhostStep::Stalled,
                            };
                        }
                    }
                }
                ahead = TILE_SIZE;
            } else if ahead < 0.0 {
                // Past the center after a reversal, facing a tile it may not enter: back up to the center
                if !self.can_step(ctx.grid, tile, self.direction) {
                    if distance <= 0.0 {
                        break;
                    }
                    let step = distance.min(-ahead);
                    self.position -= heading * step;
                    distance -= step;
                    continue;
                }
                ahead += TILE_SIZE;
            }

            if distance <= 0.0 {
                break;
            }
            let step = distance.min(ahead);
            self.position += self.direction.as_vec2() * step;
            distance -= step;
        }

        self.velocity = self.direction.as_vec2() * self.speed;
        outcome
    }

    /// Vertical oscillation about the starting tile center while waiting in the house.
    fn bob(&mut self, now: Duration) {
        let phase = now.as_secs_f32() / timing::HOUSE_BOB_CYCLE.as_secs_f32() * TAU;
        let center = MazeGrid::tile_center(self.start_tile);
        self.position = center + Vec2::Y * phase.sin() * motion::HOUSE_BOB_AMPLITUDE * TILE_SIZE;
        self.velocity = Vec2::ZERO;
    }

    fn revive(&mut self, mode: GhostMode) {
        debug!(ghost = ?self.ghost_type, tile = %self.start_tile, mode = ?mode, "Eaten ghost returned home");
        self.set_mode(mode);
        self.direction = Direction::Up;
    }

    /// Picks the next direction at the center of `tile`, or `None` if the ghost is boxed in.
    fn decide<R: Rng + ?Sized>(&mut self, tile: IVec2, ctx: &GhostContext<'_>, rng: &mut R) -> Option<Direction> {
        let target = self.current_target(ctx, tile);
        self.target = target;

        let options = self.valid_directions(ctx.grid, tile);
        if options.is_empty() {
            let reverse = self.direction.opposite();
            if self.can_step(ctx.grid, tile, reverse) {
                trace!(ghost = ?self.ghost_type, tile = %tile, direction = ?reverse, "Ghost forced to reverse direction");
                return Some(reverse);
            }
            trace!(ghost = ?self.ghost_type, tile = %tile, "Ghost stuck with no available directions");
            return None;
        }

        if ctx.grid.is_house(tile) && self.mode != GhostMode::Eaten {
            return Some(closest_to(&options, tile, target));
        }

        let choice = match self.mode {
            GhostMode::Frightened => options.as_slice().choose(rng).copied(),
            GhostMode::Eaten => self.path_home(ctx.grid, tile).filter(|dir| options.contains(dir)),
            GhostMode::Scatter | GhostMode::Chase
                if self.ghost_type.turns_randomly() && options.len() > 1 && rng.random_bool(ctx.random_turn_chance.clamp(0.0, 1.0)) =>
            {
                options.as_slice().choose(rng).copied()
            }
            GhostMode::Scatter | GhostMode::Chase => None,
        };

        Some(choice.unwrap_or_else(|| closest_to(&options, tile, target)))
    }

    /// The first step of a shortest walk from `tile` back to the starting tile.
    fn path_home(&self, grid: &MazeGrid, tile: IVec2) -> Option<Direction> {
        let goal = self.start_tile;
        let path = bfs(
            &tile,
            |&node| {
                Direction::DECISION_ORDER
                    .into_iter()
                    .filter(|&dir| self.can_step(grid, node, dir))
                    .map(|dir| node + dir.as_ivec2())
                    .collect::<SmallVec<[IVec2; 4]>>()
            },
            |&node| node == goal,
        )?;

        let next = *path.get(1)?;
        Direction::DECISION_ORDER.into_iter().find(|dir| tile + dir.as_ivec2() == next)
    }
}

/// The option whose neighboring tile center lies closest to `target`. Ties go to the earlier option.
fn closest_to(options: &[Direction], tile: IVec2, target: Vec2) -> Direction {
    let mut best = options[0];
    let mut best_distance = f32::INFINITY;
    for &dir in options {
        let distance = MazeGrid::tile_center(tile + dir.as_ivec2()).distance(target);
        if distance < best_distance {
            best = dir;
            best_distance = distance;
        }
    }
    best
}
