//! Single-shot, cancellable timers for the controller loop.
//!
//! Nothing here runs on its own: the owner of the loop asks for the next
//! deadline, waits, and then pops due timers one by one. Scheduling an id that
//! is already pending restarts it, so at most one instance of each timer
//! exists at any time.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Timers owned by the query controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// Issues the debounced full-text request.
    FullTextDispatch,
    /// Commits the merged list to the sink.
    Commit,
    /// Shows the "searching…" indicator for slow full-text requests.
    SearchingIndicator,
    SpellCorrection,
    AutoPronunciation,
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

pub struct DebounceScheduler {
    clock: Arc<dyn Clock>,
    deadlines: HashMap<TimerId, Instant>,
}

impl DebounceScheduler {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            deadlines: HashMap::new(),
        }
    }

    /// Starts `id`, replacing any pending instance of it.
    pub fn schedule_once(&mut self, id: TimerId, delay: Duration) {
        let deadline = self.clock.now() + delay;
        self.deadlines.insert(id, deadline);
    }

    /// Returns true if the timer was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.deadlines.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    pub fn has_pending(&self) -> bool {
        !self.deadlines.is_empty()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Time left until the earliest pending timer; zero if one is overdue.
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = self.clock.now();
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Removes and returns the earliest timer whose deadline has passed.
    ///
    /// Ties are broken by `TimerId` order so firing order is deterministic.
    pub fn pop_due(&mut self) -> Option<TimerId> {
        let now = self.clock.now();
        let id = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .min_by_key(|(id, deadline)| (**deadline, **id))
            .map(|(id, _)| *id)?;
        self.deadlines.remove(&id);
        Some(id)
    }
}

/// Delay before a result list is committed, scaled by the incremental hit count.
///
/// `base * clamp(count / cap, 0.3, 1.0)`, truncated to whole milliseconds.
/// A zero `cap` uses the full base delay.
pub fn adaptive_delay(
    incremental_count: usize,
    incremental_cap: usize,
    base: Duration,
) -> Duration {
    const FLOOR: f64 = 0.3;

    let ratio = if incremental_cap == 0 {
        1.0
    } else {
        (incremental_count as f64 / incremental_cap as f64).clamp(FLOOR, 1.0)
    };
    Duration::from_millis((base.as_millis() as f64 * ratio) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> (ManualClock, DebounceScheduler) {
        let clock = ManualClock::new();
        let scheduler = DebounceScheduler::new(Arc::new(clock.clone()));
        (clock, scheduler)
    }

    mod timers {
        use super::*;

        #[test]
        fn test_timer_fires_only_after_deadline() {
            let (clock, mut scheduler) = scheduler();
            scheduler.schedule_once(TimerId::Commit, Duration::from_millis(100));

            clock.advance(Duration::from_millis(99));
            assert_eq!(scheduler.pop_due(), None);

            clock.advance(Duration::from_millis(1));
            assert_eq!(scheduler.pop_due(), Some(TimerId::Commit));
            assert_eq!(scheduler.pop_due(), None);
            assert!(!scheduler.has_pending());
        }

        #[test]
        fn test_zero_delay_is_due_immediately() {
            let (_clock, mut scheduler) = scheduler();
            scheduler.schedule_once(TimerId::FullTextDispatch, Duration::ZERO);

            assert_eq!(scheduler.pop_due(), Some(TimerId::FullTextDispatch));
        }

        #[test]
        fn test_rescheduling_restarts_the_timer() {
            let (clock, mut scheduler) = scheduler();
            scheduler.schedule_once(TimerId::Commit, Duration::from_millis(50));
            clock.advance(Duration::from_millis(40));
            scheduler.schedule_once(TimerId::Commit, Duration::from_millis(50));

            clock.advance(Duration::from_millis(20));
            assert_eq!(scheduler.pop_due(), None);

            clock.advance(Duration::from_millis(30));
            assert_eq!(scheduler.pop_due(), Some(TimerId::Commit));
            assert_eq!(scheduler.pop_due(), None);
        }

        #[test]
        fn test_cancel_is_idempotent() {
            let (clock, mut scheduler) = scheduler();
            scheduler.schedule_once(TimerId::SpellCorrection, Duration::from_millis(10));

            assert!(scheduler.cancel(TimerId::SpellCorrection));
            assert!(!scheduler.cancel(TimerId::SpellCorrection));

            clock.advance(Duration::from_millis(10));
            assert_eq!(scheduler.pop_due(), None);
        }

        #[test]
        fn test_due_timers_fire_in_deadline_order() {
            let (clock, mut scheduler) = scheduler();
            scheduler.schedule_once(TimerId::SpellCorrection, Duration::from_millis(30));
            scheduler.schedule_once(TimerId::Commit, Duration::from_millis(10));
            scheduler.schedule_once(TimerId::SearchingIndicator, Duration::from_millis(20));

            clock.advance(Duration::from_millis(30));
            assert_eq!(scheduler.pop_due(), Some(TimerId::Commit));
            assert_eq!(scheduler.pop_due(), Some(TimerId::SearchingIndicator));
            assert_eq!(scheduler.pop_due(), Some(TimerId::SpellCorrection));
        }

        #[test]
        fn test_time_until_next() {
            let (clock, mut scheduler) = scheduler();
            assert_eq!(scheduler.time_until_next(), None);

            scheduler.schedule_once(TimerId::Commit, Duration::from_millis(80));
            scheduler.schedule_once(TimerId::SpellCorrection, Duration::from_millis(200));
            assert_eq!(scheduler.time_until_next(), Some(Duration::from_millis(80)));

            clock.advance(Duration::from_millis(100));
            assert_eq!(scheduler.time_until_next(), Some(Duration::ZERO));
        }
    }

    mod delay {
        use super::*;

        const BASE: Duration = Duration::from_millis(100);

        #[test]
        fn test_floor_and_ceiling() {
            assert_eq!(adaptive_delay(0, 500, BASE), Duration::from_millis(30));
            assert_eq!(adaptive_delay(150, 500, BASE), Duration::from_millis(30));
            assert_eq!(adaptive_delay(250, 500, BASE), Duration::from_millis(50));
            assert_eq!(adaptive_delay(500, 500, BASE), BASE);
            assert_eq!(adaptive_delay(5_000, 500, BASE), BASE);
        }

        #[test]
        fn test_bounds_and_monotonicity_over_all_counts() {
            let mut previous = Duration::ZERO;
            for count in 0..=600 {
                let delay = adaptive_delay(count, 500, BASE);
                assert!(delay >= Duration::from_millis(30), "count {count}");
                assert!(delay <= BASE, "count {count}");
                assert!(delay >= previous, "count {count}");
                previous = delay;
            }
        }

        #[test]
        fn test_zero_cap_uses_base() {
            assert_eq!(adaptive_delay(3, 0, BASE), BASE);
        }
    }
}
