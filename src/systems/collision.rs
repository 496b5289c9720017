use glam::Vec2;
use smallvec::SmallVec;

use crate::entity::ghost::{Ghost, GhostType};

/// Returns whether two entity centers are close enough to count as touching.
///
/// `threshold` is the center-to-center distance, in simulation units, below which they overlap.
pub fn check_collision(a: Vec2, b: Vec2, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

/// Every ghost overlapping the player, in update order.
pub fn overlapping_ghosts(player: Vec2, ghosts: &[Ghost], threshold: f32) -> SmallVec<[GhostType; 4]> {
    ghosts
        .iter()
        .filter(|ghost| check_collision(player, ghost.position(), threshold))
        .map(|ghost| ghost.ghost_type)
        .collect()
}
