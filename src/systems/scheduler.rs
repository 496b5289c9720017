//! Cancellable one-shot and periodic timers on a host-driven clock.
//!
//! The scheduler never looks at wall time. The host moves its horizon forward with
//! [`Scheduler::advance`] and then drains due timers one by one with [`Scheduler::pop_due`].
//! While a timer is being handled, [`Scheduler::now`] reads its exact due time, so timers
//! scheduled from a handler are measured from the moment the previous one fired.

use std::time::Duration;

use tracing::trace;

/// The shortest period a periodic timer may have.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Identifies a scheduled timer. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Timer<E> {
    id: u64,
    due: Duration,
    period: Option<Duration>,
    event: E,
}

#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    now: Duration,
    horizon: Duration,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current clock reading.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Schedules `event` to fire once, `delay` from now.
    pub fn delayed_call(&mut self, delay: Duration, event: E) -> TimerHandle {
        self.insert(delay, None, event)
    }

    /// Schedules `event` to fire every `period`, starting one period from now.
    pub fn periodic(&mut self, period: Duration, event: E) -> TimerHandle {
        let period = period.max(MIN_PERIOD);
        self.insert(period, Some(period), event)
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            period,
            event,
        });
        trace!(id, delay = ?delay, periodic = period.is_some(), "Timer scheduled");
        TimerHandle(id)
    }

    /// Cancels a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.id != handle.0);
        before != self.timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|timer| timer.id == handle.0)
    }

    /// Time left until the timer next fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .iter()
            .find(|timer| timer.id == handle.0)
            .map(|timer| timer.due.saturating_sub(self.now))
    }

    /// Moves the horizon forward. Timers due up to the new horizon become available to [`pop_due`](Self::pop_due).
    pub fn advance(&mut self, dt: Duration) {
        self.horizon = self.horizon.max(self.now) + dt;
    }

    /// Removes and returns the earliest timer due by the horizon, setting the clock to its due time.
    ///
    /// Periodic timers are re-armed rather than removed. Timers due at the same instant fire in the
    /// order they were scheduled. Once nothing is due, the clock catches up with the horizon.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, E)> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= self.horizon)
            .min_by_key(|(_, timer)| (timer.due, timer.id))
            .map(|(index, _)| index);

        let Some(index) = index else {
            self.now = self.horizon;
            return None;
        };

        self.now = self.timers[index].due;
        let handle = TimerHandle(self.timers[index].id);

        match self.timers[index].period {
            Some(period) => {
                let timer = &mut self.timers[index];
                timer.due += period;
                Some((handle, timer.event.clone()))
            }
            None => {
                let timer = self.timers.swap_remove(index);
                Some((handle, timer.event))
            }
        }
    }

    /// Cancels every pending timer. The clock keeps its reading.
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(scheduler: &mut Scheduler<&'static str>) -> Vec<(Duration, &'static str)> {
        let mut fired = Vec::new();
        while let Some((_, event)) = scheduler.pop_due() {
            fired.push((scheduler.now(), event));
        }
        fired
    }

    #[test]
    fn test_delayed_call_fires_once() {
        let mut scheduler = Scheduler::new();
        scheduler.delayed_call(Duration::from_millis(100), "a");

        scheduler.advance(Duration::from_millis(99));
        assert!(drain(&mut scheduler).is_empty());

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(drain(&mut scheduler), vec![(Duration::from_millis(100), "a")]);

        scheduler.advance(Duration::from_millis(500));
        assert!(drain(&mut scheduler).is_empty());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.delayed_call(Duration::from_millis(30), "late");
        scheduler.delayed_call(Duration::from_millis(10), "early");
        scheduler.delayed_call(Duration::from_millis(10), "early-second");

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(
            drain(&mut scheduler),
            vec![
                (Duration::from_millis(10), "early"),
                (Duration::from_millis(10), "early-second"),
                (Duration::from_millis(30), "late"),
            ]
        );
        assert_eq!(scheduler.now(), Duration::from_millis(50));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.delayed_call(Duration::from_millis(10), "a");
        assert!(scheduler.is_pending(handle));
        assert!(scheduler.cancel(handle));
        assert!(!scheduler.cancel(handle));
        assert!(!scheduler.is_pending(handle));

        scheduler.advance(Duration::from_millis(20));
        assert!(drain(&mut scheduler).is_empty());
    }

    #[test]
    fn test_periodic_rearms() {
        let mut scheduler = Scheduler::new();
        let handle = scheduler.periodic(Duration::from_millis(250), "tick");

        scheduler.advance(Duration::from_millis(600));
        assert_eq!(
            drain(&mut scheduler),
            vec![(Duration::from_millis(250), "tick"), (Duration::from_millis(500), "tick")]
        );
        assert_eq!(scheduler.remaining(handle), Some(Duration::from_millis(150)));
    }

    #[test]
    fn test_chained_timer_measured_from_fire_time() {
        let mut scheduler = Scheduler::new();
        scheduler.delayed_call(Duration::from_millis(10), "first");
        scheduler.advance(Duration::from_millis(100));

        let mut fired = Vec::new();
        while let Some((_, event)) = scheduler.pop_due() {
            fired.push((scheduler.now(), event));
            if event == "first" {
                scheduler.delayed_call(Duration::from_millis(20), "second");
            }
        }

        assert_eq!(
            fired,
            vec![(Duration::from_millis(10), "first"), (Duration::from_millis(30), "second")]
        );
    }

    #[test]
    fn test_zero_delay_fires_on_next_drain() {
        let mut scheduler = Scheduler::new();
        scheduler.delayed_call(Duration::ZERO, "now");
        assert_eq!(drain(&mut scheduler), vec![(Duration::ZERO, "now")]);
    }
}
