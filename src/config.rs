//! Tunable simulation parameters.
//!
//! Every timing, speed and tolerance the core uses is gathered here so a host can match a
//! specific reference build. [`GameConfig::default`] yields the values in [`crate::constants`].

use std::time::Duration;

use crate::constants::{motion, speed, targeting, timing};
use crate::entity::ghost::GhostMode;
use crate::error::ConfigError;

/// One entry of the global scatter/chase pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModePhase {
    pub mode: GhostMode,
    /// How long the phase lasts; `None` means it never ends.
    pub duration: Option<Duration>,
}

/// Movement speeds, in simulation units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    pub ghost_normal: f32,
    pub ghost_frightened: f32,
    pub ghost_eaten: f32,
    pub player: f32,
}

impl SpeedConfig {
    /// The ghost speed for a given mode.
    pub fn for_mode(&self, mode: GhostMode) -> f32 {
        match mode {
            GhostMode::Scatter | GhostMode::Chase => self.ghost_normal,
            GhostMode::Frightened => self.ghost_frightened,
            GhostMode::Eaten => self.ghost_eaten,
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            ghost_normal: speed::GHOST_NORMAL,
            ghost_frightened: speed::GHOST_FRIGHTENED,
            ghost_eaten: speed::GHOST_EATEN,
            player: speed::PLAYER,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub mode_schedule: Vec<ModePhase>,
    pub frightened_duration: Duration,
    pub frightened_warning: Duration,
    pub frightened_flash_interval: Duration,
    pub release_delays: [Duration; 4],
    pub reset_release_delay: Duration,
    pub speeds: SpeedConfig,
    /// In tiles.
    pub centering_tolerance: f32,
    /// In tiles.
    pub stop_distance: f32,
    /// In tiles.
    pub collision_distance: f32,
    pub clyde_random_turn_chance: f64,
    /// Seed for ghost randomness; `None` seeds from the operating system.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode_schedule: timing::MODE_PATTERN
                .iter()
                .map(|&(mode, duration)| ModePhase { mode, duration })
                .collect(),
            frightened_duration: timing::FRIGHTENED_DURATION,
            frightened_warning: timing::FRIGHTENED_WARNING,
            frightened_flash_interval: timing::FRIGHTENED_FLASH_INTERVAL,
            release_delays: timing::RELEASE_DELAYS,
            reset_release_delay: timing::RESET_RELEASE_DELAY,
            speeds: SpeedConfig::default(),
            centering_tolerance: motion::CENTERING_TOLERANCE,
            stop_distance: motion::STOP_DISTANCE,
            collision_distance: motion::COLLISION_DISTANCE,
            clyde_random_turn_chance: targeting::CLYDE_RANDOM_TURN_CHANCE,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Returns a copy of this configuration with a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Checks that the configuration describes a playable schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mode_schedule.is_empty() {
            return Err(ConfigError::EmptyModeSchedule);
        }

        let last = self.mode_schedule.len() - 1;
        for (index, phase) in self.mode_schedule.iter().enumerate() {
            if !matches!(phase.mode, GhostMode::Scatter | GhostMode::Chase) {
                return Err(ConfigError::UnschedulableMode { index, mode: phase.mode });
            }
            match phase.duration {
                None if index != last => return Err(ConfigError::IndefinitePhaseNotLast(index)),
                Some(duration) if duration.is_zero() => return Err(ConfigError::ZeroLengthPhase(index)),
                _ => {}
            }
        }

        if self.frightened_duration.is_zero() {
            return Err(ConfigError::NonPositive("frightened_duration"));
        }
        if self.frightened_warning > self.frightened_duration {
            return Err(ConfigError::WarningExceedsDuration {
                warning: self.frightened_warning,
                duration: self.frightened_duration,
            });
        }
        if self.frightened_flash_interval.is_zero() {
            return Err(ConfigError::NonPositive("frightened_flash_interval"));
        }

        let positive = [
            ("speeds.ghost_normal", self.speeds.ghost_normal),
            ("speeds.ghost_frightened", self.speeds.ghost_frightened),
            ("speeds.ghost_eaten", self.speeds.ghost_eaten),
            ("speeds.player", self.speeds.player),
            ("centering_tolerance", self.centering_tolerance),
            ("stop_distance", self.stop_distance),
            ("collision_distance", self.collision_distance),
        ];
        if let Some(&(name, _)) = positive.iter().find(|(_, value)| !(*value > 0.0)) {
            return Err(ConfigError::NonPositive(name));
        }

        if !(0.0..=1.0).contains(&self.clyde_random_turn_chance) {
            return Err(ConfigError::OutOfUnitRange("clyde_random_turn_chance"));
        }

        Ok(())
    }
}
