//! The coordinator that owns all four ghosts and every timer that drives them.

use std::time::Duration;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::constants::{score, TILE_SIZE};
use crate::entity::ghost::{Ghost, GhostContext, GhostMode, GhostStep, GhostType};
use crate::entity::player::PlayerSnapshot;
use crate::entity::targeting::TargetingStrategy;
use crate::events::{EventSink, GameEvent};
use crate::map::grid::MazeGrid;
use crate::systems::collision::overlapping_ghosts;
use crate::systems::scheduler::{Scheduler, TimerHandle};

/// Everything the coordinator schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorTimer {
    ModeExpired,
    /// The full-strength part of a frightened period ended.
    FrightenedWarning,
    FrightenedExpired,
    FlashToggle,
    Release(GhostType),
}

/// What collision resolution found this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    pub eaten: u32,
    /// The ghost that caught the player, if any.
    pub killer: Option<GhostType>,
}

pub struct GhostCoordinator {
    ghosts: [Ghost; GhostType::COUNT],
    scheduler: Scheduler<CoordinatorTimer>,
    config: GameConfig,
    pattern_index: usize,
    mode_timer: Option<TimerHandle>,
    frightened_timer: Option<TimerHandle>,
    flash_timer: Option<TimerHandle>,
    release_timers: [Option<TimerHandle>; GhostType::COUNT],
    /// Ghosts eaten since the current frightened period began.
    eaten_this_period: u32,
    ghost_points: u32,
    paused: bool,
    rng: SmallRng,
}

impl GhostCoordinator {
    /// Creates the four housed ghosts. No timer runs until [`start`](Self::start).
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        Self {
            ghosts: GhostType::ALL.map(|ghost_type| Ghost::new(ghost_type, config.speeds)),
            scheduler: Scheduler::new(),
            config: config.clone(),
            pattern_index: 0,
            mode_timer: None,
            frightened_timer: None,
            flash_timer: None,
            release_timers: [None; GhostType::COUNT],
            eaten_this_period: 0,
            ghost_points: 0,
            paused: false,
            rng,
        }
    }

    /// Starts the mode schedule from its first phase and the release schedule without extra delay.
    pub fn start(&mut self, events: &mut impl EventSink) {
        self.pattern_index = 0;
        self.start_mode_timer(events);
        self.schedule_releases(Duration::ZERO);
    }

    pub fn ghosts(&self) -> &[Ghost; GhostType::COUNT] {
        &self.ghosts
    }

    pub fn ghost(&self, ghost_type: GhostType) -> &Ghost {
        &self.ghosts[ghost_type.index()]
    }

    pub fn ghost_mut(&mut self, ghost_type: GhostType) -> &mut Ghost {
        &mut self.ghosts[ghost_type.index()]
    }

    /// The mode the global schedule currently dictates.
    pub fn current_mode(&self) -> GhostMode {
        self.config
            .mode_schedule
            .get(self.pattern_index)
            .map_or(GhostMode::Chase, |phase| phase.mode)
    }

    pub fn pattern_index(&self) -> usize {
        self.pattern_index
    }

    /// The coordinator clock. It does not advance while paused.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_frightened_active(&self) -> bool {
        self.frightened_timer.is_some()
    }

    /// Time left until the current mode phase ends; `None` for an indefinite phase or while paused.
    pub fn mode_time_remaining(&self) -> Option<Duration> {
        self.mode_timer.and_then(|handle| self.scheduler.remaining(handle))
    }

    pub fn eaten_this_period(&self) -> u32 {
        self.eaten_this_period
    }

    /// Points earned from eating ghosts so far.
    pub fn ghost_points(&self) -> u32 {
        self.ghost_points
    }

    pub fn clear_points(&mut self) {
        self.ghost_points = 0;
    }

    /// Advances the clock, fires due timers, then moves every ghost once.
    ///
    /// Ghosts update in Blinky, Pinky, Inky, Clyde order and all see the same player snapshot.
    pub fn update(&mut self, dt: Duration, player: Option<&PlayerSnapshot>, grid: &MazeGrid, events: &mut impl EventSink) {
        if self.paused {
            return;
        }

        self.scheduler.advance(dt);
        while let Some((_, timer)) = self.scheduler.pop_due() {
            self.on_timer(timer, events);
        }

        let positions: [Vec2; GhostType::COUNT] = self.ghosts.each_ref().map(|ghost| ghost.position());
        let now = self.scheduler.now();
        let schedule_mode = self.current_mode();

        for ghost in self.ghosts.iter_mut() {
            let partner = match ghost.ghost_type.strategy() {
                TargetingStrategy::Reflected { .. } => Some(positions[GhostType::Blinky.index()]),
                _ => None,
            };
            let ctx = GhostContext {
                grid,
                player,
                partner,
                now,
                dt,
                random_turn_chance: self.config.clyde_random_turn_chance,
                schedule_mode,
            };

            if ghost.update(&ctx, &mut self.rng) == GhostStep::Revived {
                events.emit(GameEvent::GhostRevived(ghost.ghost_type));
            }
        }
    }

    fn on_timer(&mut self, timer: CoordinatorTimer, events: &mut impl EventSink) {
        trace!(timer = ?timer, now = ?self.scheduler.now(), "Coordinator timer fired");
        match timer {
            CoordinatorTimer::ModeExpired => {
                self.mode_timer = None;
                if self.pattern_index + 1 < self.config.mode_schedule.len() {
                    self.pattern_index += 1;
                }
                self.start_mode_timer(events);
            }
            CoordinatorTimer::FrightenedWarning => {
                self.frightened_timer = Some(
                    self.scheduler
                        .delayed_call(self.config.frightened_warning, CoordinatorTimer::FrightenedExpired),
                );
                for ghost in self.frightened_ghosts_mut() {
                    ghost.set_warning(true);
                }
                self.flash_timer = Some(
                    self.scheduler
                        .periodic(self.config.frightened_flash_interval, CoordinatorTimer::FlashToggle),
                );
                debug!("Frightened period entering warning");
                events.emit(GameEvent::FrightenedWarning);
            }
            CoordinatorTimer::FlashToggle => {
                for ghost in self.frightened_ghosts_mut() {
                    ghost.toggle_flash();
                }
            }
            CoordinatorTimer::FrightenedExpired => {
                self.frightened_timer = None;
                self.cancel_flash();
                let mode = self.current_mode();
                for ghost in self.frightened_ghosts_mut() {
                    ghost.set_mode(mode);
                }
                debug!(mode = ?mode, "Frightened period ended");
                events.emit(GameEvent::FrightenedEnded);
            }
            CoordinatorTimer::Release(ghost_type) => {
                self.release_timers[ghost_type.index()] = None;
                let mode = self.current_mode();
                let ghost = self.ghost_mut(ghost_type);
                if ghost.is_in_house() {
                    ghost.release(mode);
                    debug!(ghost = ?ghost_type, mode = ?mode, "Ghost released");
                    events.emit(GameEvent::GhostReleased(ghost_type));
                }
            }
        }
    }

    fn frightened_ghosts_mut(&mut self) -> impl Iterator<Item = &mut Ghost> {
        self.ghosts.iter_mut().filter(|ghost| ghost.mode() == GhostMode::Frightened)
    }

    /// Applies the current schedule phase to every ghost not Frightened or Eaten and arms its expiry.
    fn start_mode_timer(&mut self, events: &mut impl EventSink) {
        if let Some(handle) = self.mode_timer.take() {
            self.scheduler.cancel(handle);
        }

        let Some(phase) = self.config.mode_schedule.get(self.pattern_index).copied() else {
            return;
        };

        for ghost in self.ghosts.iter_mut() {
            if !matches!(ghost.mode(), GhostMode::Frightened | GhostMode::Eaten) {
                ghost.set_mode(phase.mode);
            }
        }

        self.mode_timer = phase
            .duration
            .map(|duration| self.scheduler.delayed_call(duration, CoordinatorTimer::ModeExpired));

        debug!(index = self.pattern_index, mode = ?phase.mode, duration = ?phase.duration, "Mode phase started");
        events.emit(GameEvent::ModeChanged(phase.mode));
    }

    /// Schedules a release for every ghost still in the house, `base` plus its own offset from now.
    fn schedule_releases(&mut self, base: Duration) {
        for ghost_type in GhostType::iter() {
            let index = ghost_type.index();
            if let Some(handle) = self.release_timers[index].take() {
                self.scheduler.cancel(handle);
            }
            if self.ghosts[index].is_in_house() {
                let delay = base + self.config.release_delays[index];
                self.release_timers[index] = Some(self.scheduler.delayed_call(delay, CoordinatorTimer::Release(ghost_type)));
            }
        }
    }

    fn cancel_flash(&mut self) {
        if let Some(handle) = self.flash_timer.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_schedule_timers(&mut self) {
        if let Some(handle) = self.mode_timer.take() {
            self.scheduler.cancel(handle);
        }
        for slot in self.release_timers.iter_mut() {
            if let Some(handle) = slot.take() {
                self.scheduler.cancel(handle);
            }
        }
    }

    /// Starts (or restarts) a frightened period.
    ///
    /// Any running countdown is replaced, the eaten counter starts over, and every ghost that is not
    /// Eaten turns Frightened and reverses.
    pub fn on_power_pellet(&mut self) {
        if let Some(handle) = self.frightened_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.cancel_flash();
        self.eaten_this_period = 0;

        for ghost in self.ghosts.iter_mut() {
            if ghost.mode() != GhostMode::Eaten {
                ghost.frighten();
            }
        }

        let full = self.config.frightened_duration.saturating_sub(self.config.frightened_warning);
        self.frightened_timer = Some(self.scheduler.delayed_call(full, CoordinatorTimer::FrightenedWarning));

        debug!(duration = ?self.config.frightened_duration, "Frightened period started");
    }

    /// Resolves every ghost overlapping the player.
    ///
    /// A Frightened ghost is eaten and scores `200 * 2^N`, where N counts the ghosts already eaten
    /// this period. An Eaten ghost is harmless. Any other ghost kills the player, which ends
    /// resolution for this tick.
    pub fn handle_collisions(&mut self, player: Vec2, events: &mut impl EventSink) -> CollisionReport {
        let threshold = self.config.collision_distance * TILE_SIZE;
        let mut report = CollisionReport::default();

        for ghost_type in overlapping_ghosts(player, &self.ghosts, threshold) {
            match self.ghost(ghost_type).mode() {
                GhostMode::Frightened => {
                    let points = score::GHOST_BASE.saturating_mul(2u32.saturating_pow(self.eaten_this_period));
                    self.eaten_this_period += 1;
                    self.ghost_points += points;
                    self.ghost_mut(ghost_type).set_mode(GhostMode::Eaten);
                    report.eaten += 1;

                    info!(ghost = ?ghost_type, points, streak = self.eaten_this_period, "Ghost eaten");
                    events.emit(GameEvent::ScoreUpdated(points));
                    events.emit(GameEvent::GhostEaten {
                        ghost: ghost_type,
                        points,
                    });
                }
                GhostMode::Eaten => {}
                GhostMode::Scatter | GhostMode::Chase => {
                    info!(ghost = ?ghost_type, "Player caught");
                    events.emit(GameEvent::PlayerDied { ghost: ghost_type });
                    report.killer = Some(ghost_type);
                    break;
                }
            }
        }

        report
    }

    /// Freezes every ghost and the coordinator clock, dropping the mode and release timers.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.cancel_schedule_timers();
        for ghost in self.ghosts.iter_mut() {
            ghost.halt();
        }
        info!(now = ?self.scheduler.now(), "Ghosts paused");
    }

    /// Restarts the current mode phase from its full duration and reschedules releases for housed ghosts.
    pub fn resume(&mut self, events: &mut impl EventSink) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.start_mode_timer(events);
        self.schedule_releases(Duration::ZERO);
        info!(now = ?self.scheduler.now(), "Ghosts resumed");
    }

    /// Sends every ghost home and restarts both schedules, releasing after the reset delay.
    pub fn reset(&mut self, events: &mut impl EventSink) {
        self.scheduler.clear();
        self.mode_timer = None;
        self.frightened_timer = None;
        self.flash_timer = None;
        self.release_timers = [None; GhostType::COUNT];
        self.eaten_this_period = 0;
        self.paused = false;
        self.pattern_index = 0;

        for ghost in self.ghosts.iter_mut() {
            ghost.reset(GhostMode::Chase);
        }

        self.start_mode_timer(events);
        self.schedule_releases(self.config.reset_release_delay);
        info!("Ghosts reset");
    }
}
