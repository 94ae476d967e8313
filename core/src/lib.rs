//! Circuit breaker driven by consecutive outcomes
//!
//! This crate wraps an unreliable operation (typically a remote call) and stops
//! calling it while it keeps failing:
//! - Consecutive success/failure streaks with time-based decay
//! - State machine for the breaker lifecycle (Closed → Open → HalfOpen)
//! - Lazy Open → HalfOpen promotion observed on status reads, no timer threads
//! - Manual block/unblock override and full reset
//! - Pluggable logging sink and monotonic time source
//!
//! # Example
//!
//! ```rust
//! use circuit_breaker::{CircuitBreaker, CircuitError, Status};
//!
//! let breaker = CircuitBreaker::builder("twitter-api")
//!     .failure_threshold(1)
//!     .success_threshold(2)
//!     .open_period_secs(2.0)
//!     .build();
//!
//! // Two consecutive failures exceed a threshold of 1
//! let _ = breaker.call(|| Err::<(), _>("timeout"));
//! let _ = breaker.call(|| Err::<(), _>("timeout"));
//! assert_eq!(breaker.status(), Status::Open);
//!
//! // While open, the operation is not attempted
//! let result = breaker.call(|| Ok::<_, &str>("unreachable"));
//! assert!(matches!(result, Err(CircuitError::RequestDisabled { .. })));
//! ```

pub mod builder;
pub mod circuit;
pub mod clock;
pub mod counter;
pub mod errors;
pub mod logger;
pub mod state;

pub use builder::CircuitBuilder;
pub use circuit::{CircuitBreaker, Config};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use counter::OutcomeCounter;
pub use errors::{CircuitError, ConfigError};
pub use logger::{Field, Logger, NoopLogger, TracingLogger};
pub use state::BreakerState;

use std::fmt;

/// Effective status of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Requests flow to the wrapped operation
    Closed,
    /// Requests are rejected without calling the operation
    Open,
    /// Trial state: requests flow, but the first failure reopens the circuit
    HalfOpen,
}

impl Status {
    /// Lowercase name used in logs (`closed`, `open`, `half-open`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Closed => "closed",
            Status::Open => "open",
            Status::HalfOpen => "half-open",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
