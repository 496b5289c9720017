//! Target selection for the four ghost personalities.
//!
//! Each personality is a [`TargetingStrategy`] value rather than a separate type, and the
//! target itself is produced by the pure [`compute_target`] function so it can be tested
//! without a maze, a clock or any other ghost.

use glam::Vec2;

use crate::constants::TILE_SIZE;
use crate::entity::ghost::GhostMode;
use crate::entity::player::PlayerSnapshot;

/// How a ghost picks its chase target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetingStrategy {
    /// Aim straight at the player.
    Direct,
    /// Aim a number of tiles ahead of the player along its dominant axis of travel.
    Ahead { tiles: f32 },
    /// Take the point `tiles` ahead of the player and double the vector to it from another ghost.
    Reflected { tiles: f32 },
    /// Chase the player while further away than `radius` tiles, otherwise retreat to the corner.
    ProximityFlee { radius: f32 },
}

/// The ghost-side inputs to target selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetContext {
    pub mode: GhostMode,
    pub position: Vec2,
    pub scatter_target: Vec2,
    /// Where the ghost returns to when eaten.
    pub home: Vec2,
}

/// Computes the point a ghost steers toward.
///
/// Scatter always yields the scatter corner and Eaten always yields home. Frightened ghosts do
/// not use their target, but it is still computed as in Chase. Without a player the scatter corner
/// is used. `aux` is the position of the partner ghost a [`TargetingStrategy::Reflected`] ghost
/// mirrors through; without it the look-ahead point is used unchanged.
pub fn compute_target(
    strategy: TargetingStrategy,
    ctx: &TargetContext,
    player: Option<&PlayerSnapshot>,
    aux: Option<Vec2>,
) -> Vec2 {
    match ctx.mode {
        GhostMode::Scatter => return ctx.scatter_target,
        GhostMode::Eaten => return ctx.home,
        GhostMode::Chase | GhostMode::Frightened => {}
    }

    let Some(player) = player else {
        return ctx.scatter_target;
    };

    match strategy {
        TargetingStrategy::Direct => player.position,
        TargetingStrategy::Ahead { tiles } => look_ahead(player, tiles),
        TargetingStrategy::Reflected { tiles } => {
            let ahead = look_ahead(player, tiles);
            match aux {
                Some(partner) => partner + 2.0 * (ahead - partner),
                None => ahead,
            }
        }
        TargetingStrategy::ProximityFlee { radius } => {
            if ctx.position.distance(player.position) > radius * TILE_SIZE {
                player.position
            } else {
                ctx.scatter_target
            }
        }
    }
}

/// Projects the player's position along the dominant axis of its velocity.
fn look_ahead(player: &PlayerSnapshot, tiles: f32) -> Vec2 {
    let velocity = player.velocity;
    let step = if velocity.x.abs() >= velocity.y.abs() {
        Vec2::new(sign(velocity.x), 0.0)
    } else {
        Vec2::new(0.0, sign(velocity.y))
    };
    player.position + step * tiles * TILE_SIZE
}

/// Like `f32::signum`, but zero stays zero.
fn sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}
