//! Centralized error types for the simulation core.
//!
//! Errors only surface while building the maze or validating configuration.
//! Once a [`Game`](crate::game::Game) exists, every fault is absorbed at runtime.

use std::time::Duration;

use crate::entity::ghost::GhostMode;

/// Main error type for the simulation core.
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Map parsing error: {0}")]
    MapParse(#[from] ParseError),

    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Error type for map parsing operations.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown character in board: {0:?}")]
    UnknownCharacter(char),
    #[error("Board is empty")]
    EmptyBoard,
    #[error("Row {row} has width {width}, expected {expected}")]
    RaggedRow { row: usize, width: usize, expected: usize },
    #[error("House door must have exactly 2 positions, found {0}")]
    InvalidHouseDoorCount(usize),
    #[error("Teleport zones must come in a pair, found {0}")]
    InvalidTeleportCount(usize),
    #[error("Player starting position not found")]
    MissingPlayerStart,
}

/// Errors related to the structure of a parsed map.
#[derive(thiserror::Error, Debug)]
pub enum MapError {
    #[error("Invalid map configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised by [`GameConfig::validate`](crate::config::GameConfig::validate).
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Mode schedule is empty")]
    EmptyModeSchedule,
    #[error("Mode schedule entry {index} uses {mode:?}; only Scatter and Chase may be scheduled")]
    UnschedulableMode { index: usize, mode: GhostMode },
    #[error("Mode schedule entry {0} is indefinite but is not the last entry")]
    IndefinitePhaseNotLast(usize),
    #[error("Mode schedule entry {0} has a zero duration")]
    ZeroLengthPhase(usize),
    #[error("Frightened warning ({warning:?}) must not exceed the frightened duration ({duration:?})")]
    WarningExceedsDuration { warning: Duration, duration: Duration },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must lie within [0, 1]")]
    OutOfUnitRange(&'static str),
}

/// Result type for core operations.
pub type GameResult<T> = Result<T, GameError>;
