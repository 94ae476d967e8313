//! Time sources for the circuit breaker
//!
//! This module provides different clock implementations:
//! - `MonotonicClock`: Real monotonic time, immune to NTP clock skew
//! - `ManualClock`: Hand-driven time for tests and simulations
//!
//! All timestamps are seconds relative to the clock's own anchor. A timestamp of
//! `f64::NEG_INFINITY` stands for "never", so any elapsed-time check against it passes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Abstract source of monotonic time
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Get monotonic time in seconds (relative to clock creation)
    fn monotonic_time(&self) -> f64;
}

/// Clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    /// Monotonic time anchor
    start_time: Instant,
}

impl MonotonicClock {
    /// Create a clock anchored at the current instant
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn monotonic_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to
///
/// # Example
///
/// ```rust
/// use circuit_breaker::{CircuitBreaker, ManualClock, Status};
/// use std::sync::Arc;
///
/// let clock = Arc::new(ManualClock::new());
/// let breaker = CircuitBreaker::builder("inventory")
///     .failure_threshold(1)
///     .open_period_secs(2.0)
///     .clock(clock.clone())
///     .build();
///
/// let _ = breaker.call(|| Err::<(), _>("boom"));
/// let _ = breaker.call(|| Err::<(), _>("boom"));
/// assert_eq!(breaker.status(), Status::Open);
///
/// clock.advance(2.1);
/// assert_eq!(breaker.status(), Status::HalfOpen);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    /// Current time in seconds, stored as `f64` bits
    now: AtomicU64,
}

impl ManualClock {
    /// Create a clock reading zero seconds
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Create a clock reading `secs` seconds
    pub fn starting_at(secs: f64) -> Self {
        Self {
            now: AtomicU64::new(secs.to_bits()),
        }
    }

    /// Move the clock forward by `secs`
    pub fn advance(&self, secs: f64) {
        // fetch_update only fails when the closure returns None
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some((f64::from_bits(bits) + secs).to_bits())
            });
    }

    /// Jump to an absolute reading
    pub fn set(&self, secs: f64) {
        self.now.store(secs.to_bits(), Ordering::Release);
    }
}

impl Clock for ManualClock {
    fn monotonic_time(&self) -> f64 {
        f64::from_bits(self.now.load(Ordering::Acquire))
    }
}
