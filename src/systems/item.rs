//! Pellet placement, collection and the running pellet score.

use std::collections::{HashMap, HashSet};

use glam::{IVec2, Vec2};
use tracing::{debug, trace};

use crate::constants::score;
use crate::events::{EventSink, GameEvent};
use crate::map::grid::MazeGrid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PelletKind {
    Regular,
    Power,
}

impl PelletKind {
    pub fn score_value(self) -> u32 {
        match self {
            PelletKind::Regular => score::PELLET,
            PelletKind::Power => score::POWER_PELLET,
        }
    }
}

/// Decorative state attached to a power pellet for the UI (its pulse animation).
///
/// The core never reads it; it only hands it out and drops it when the pellet is eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlowToken(pub u32);

#[derive(Debug, Clone)]
pub struct PelletField {
    pellets: HashSet<IVec2>,
    power_pellets: HashMap<IVec2, GlowToken>,
    pellet_tiles: Vec<IVec2>,
    power_pellet_tiles: Vec<IVec2>,
    score: u32,
}

impl PelletField {
    /// Places a pellet on every pellet tile of the grid.
    pub fn new(grid: &MazeGrid) -> Self {
        let mut field = Self {
            pellets: HashSet::new(),
            power_pellets: HashMap::new(),
            pellet_tiles: grid.pellets().to_vec(),
            power_pellet_tiles: grid.power_pellets().to_vec(),
            score: 0,
        };
        field.refill();
        field
    }

    fn refill(&mut self) {
        self.pellets = self.pellet_tiles.iter().copied().collect();
        self.power_pellets = self
            .power_pellet_tiles
            .iter()
            .enumerate()
            .map(|(index, &tile)| (tile, GlowToken(index as u32)))
            .collect();
    }

    /// Restores every pellet and zeroes the score.
    pub fn reset(&mut self) {
        self.refill();
        self.score = 0;
        debug!(remaining = self.remaining_count(), "Pellets refilled");
    }

    /// Collects whatever pellet lies on the tile containing `position`.
    ///
    /// Returns the kind collected, or `None` (with no events) if the tile is empty.
    pub fn collect_at(&mut self, position: Vec2, events: &mut impl EventSink) -> Option<PelletKind> {
        self.collect_tile(MazeGrid::tile_of(position), events)
    }

    pub fn collect_tile(&mut self, tile: IVec2, events: &mut impl EventSink) -> Option<PelletKind> {
        let kind = if self.pellets.remove(&tile) {
            PelletKind::Regular
        } else if let Some(token) = self.power_pellets.remove(&tile) {
            trace!(tile = %tile, token = token.0, "Power pellet glow removed");
            PelletKind::Power
        } else {
            return None;
        };

        let points = kind.score_value();
        self.score += points;
        trace!(tile = %tile, kind = ?kind, points, score = self.score, "Pellet collected");

        events.emit(GameEvent::ScoreUpdated(points));
        if kind == PelletKind::Power {
            events.emit(GameEvent::PowerPelletCollected);
        }

        Some(kind)
    }

    pub fn has_pellet(&self, tile: IVec2) -> Option<PelletKind> {
        if self.pellets.contains(&tile) {
            Some(PelletKind::Regular)
        } else if self.power_pellets.contains_key(&tile) {
            Some(PelletKind::Power)
        } else {
            None
        }
    }

    pub fn glow_token(&self, tile: IVec2) -> Option<GlowToken> {
        self.power_pellets.get(&tile).copied()
    }

    /// Uncollected regular and power pellets combined.
    pub fn remaining_count(&self) -> usize {
        self.pellets.len() + self.power_pellets.len()
    }

    pub fn remaining_power_pellets(&self) -> usize {
        self.power_pellets.len()
    }

    /// Points earned from pellets so far.
    pub fn score(&self) -> u32 {
        self.score
    }
}
