//! Ghost AI and movement coordination core of a Pac-Man style maze chase.

pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod map;
pub mod systems;
