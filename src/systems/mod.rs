//! Systems that own and drive the entities each tick.

pub mod collision;
pub mod ghost;
pub mod item;
pub mod scheduler;
