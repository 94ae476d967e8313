//! Consecutive outcome counter
//!
//! Tracks the current success or failure streak. Only one streak is live at a
//! time: recording a failure zeroes the success tally and vice versa. A tally whose
//! last update is older than the reset period is treated as stale and restarts,
//! so a rarely used dependency is not tripped by failures spread over hours.

use crate::clock::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy)]
struct Tallies {
    failures: u32,
    successes: u32,
    last_failure: f64,
    last_success: f64,
}

impl Tallies {
    const NEVER: Self = Self {
        failures: 0,
        successes: 0,
        last_failure: f64::NEG_INFINITY,
        last_success: f64::NEG_INFINITY,
    };
}

/// Thread-safe consecutive success/failure counter with decay
#[derive(Debug)]
pub struct OutcomeCounter {
    tallies: Mutex<Tallies>,
    /// Seconds after which an idle streak restarts from zero
    reset_period_secs: f64,
    clock: Arc<dyn Clock>,
}

impl OutcomeCounter {
    /// Create a counter with both streaks at zero and no recorded outcomes
    pub fn new(reset_period_secs: f64, clock: Arc<dyn Clock>) -> Self {
        Self {
            tallies: Mutex::new(Tallies::NEVER),
            reset_period_secs,
            clock,
        }
    }

    /// Record a failure and return the length of the current failure streak
    pub fn record_failure(&self) -> u32 {
        let now = self.clock.monotonic_time();
        let mut tallies = self.lock();

        if now - tallies.last_failure > self.reset_period_secs {
            tallies.failures = 0;
        }
        tallies.last_failure = now;
        tallies.failures = tallies.failures.saturating_add(1);
        tallies.successes = 0;
        tallies.failures
    }

    /// Record a success and return the length of the current success streak
    pub fn record_success(&self) -> u32 {
        let now = self.clock.monotonic_time();
        let mut tallies = self.lock();

        if now - tallies.last_success > self.reset_period_secs {
            tallies.successes = 0;
        }
        tallies.last_success = now;
        tallies.successes = tallies.successes.saturating_add(1);
        tallies.failures = 0;
        tallies.successes
    }

    /// Zero both streaks and forget when they were last updated
    pub fn reset(&self) {
        *self.lock() = Tallies::NEVER;
    }

    /// Current failure streak
    pub fn failures(&self) -> u32 {
        self.lock().failures
    }

    /// Current success streak
    pub fn successes(&self) -> u32 {
        self.lock().successes
    }

    /// Idle period after which a streak restarts
    pub fn reset_period_secs(&self) -> f64 {
        self.reset_period_secs
    }

    // Every critical section leaves the tallies consistent, so a poisoned lock is
    // still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Tallies> {
        self.tallies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn counter(reset_period_secs: f64) -> (OutcomeCounter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (OutcomeCounter::new(reset_period_secs, clock.clone()), clock)
    }

    #[test]
    fn test_counter_starts_at_zero() {
        let (counter, _clock) = counter(60.0);

        assert_eq!(counter.failures(), 0);
        assert_eq!(counter.successes(), 0);
    }

    #[test]
    fn test_failures_accumulate() {
        let (counter, clock) = counter(60.0);

        assert_eq!(counter.record_failure(), 1);
        clock.advance(1.0);
        assert_eq!(counter.record_failure(), 2);
        clock.advance(1.0);
        assert_eq!(counter.record_failure(), 3);
        assert_eq!(counter.failures(), 3);
    }

    #[test]
    fn test_success_zeroes_failures_and_vice_versa() {
        let (counter, _clock) = counter(60.0);

        counter.record_failure();
        counter.record_failure();
        assert_eq!(counter.record_success(), 1);
        assert_eq!(counter.failures(), 0);

        counter.record_success();
        assert_eq!(counter.record_failure(), 1);
        assert_eq!(counter.successes(), 0);
    }

    #[test]
    fn test_stale_failure_streak_restarts() {
        let (counter, clock) = counter(60.0);

        counter.record_failure();
        counter.record_failure();

        clock.advance(60.5);
        assert_eq!(counter.record_failure(), 1);
    }

    #[test]
    fn test_gap_equal_to_reset_period_keeps_streak() {
        let (counter, clock) = counter(60.0);

        counter.record_failure();
        clock.advance(60.0);
        assert_eq!(counter.record_failure(), 2);
    }

    #[test]
    fn test_stale_success_streak_restarts() {
        let (counter, clock) = counter(5.0);

        counter.record_success();
        counter.record_success();
        clock.advance(6.0);

        assert_eq!(counter.record_success(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let (counter, clock) = counter(60.0);

        counter.record_failure();
        counter.record_failure();
        counter.reset();

        assert_eq!(counter.failures(), 0);
        assert_eq!(counter.successes(), 0);

        // Timestamps are forgotten too, a fresh streak starts at one
        clock.advance(1.0);
        assert_eq!(counter.record_failure(), 1);
    }

    #[test]
    fn test_concurrent_failures_are_not_lost() {
        let (counter, _clock) = counter(60.0);
        let counter = Arc::new(counter);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        counter.record_failure();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.failures(), 2000);
    }
}
