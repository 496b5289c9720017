//! The moving entities: the four ghosts and the player.

pub mod ghost;
pub mod player;
pub mod targeting;
