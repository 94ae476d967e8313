//! Circuit breaker implementation
//!
//! Composes the outcome counter and the lifecycle state into the public
//! `CircuitBreaker`, plus a manual block override.

use crate::{
    Status,
    clock::{Clock, MonotonicClock},
    counter::OutcomeCounter,
    errors::{CircuitError, ConfigError},
    logger::{Logger, NoopLogger},
    state::BreakerState,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Circuit breaker configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Consecutive failures that must be exceeded to open the circuit
    pub failure_threshold: u32,

    /// Consecutive HalfOpen successes that must be exceeded to close the circuit
    pub success_threshold: u32,

    /// Seconds the circuit stays Open before a trial request is allowed
    pub open_period_secs: f64,

    /// Seconds of inactivity after which a streak restarts from zero
    pub counter_reset_secs: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            success_threshold: 5,
            open_period_secs: 60.0,
            counter_reset_secs: 60.0,
        }
    }
}

impl Config {
    /// Check thresholds and periods are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.failure_threshold == 0 {
            return Err(ConfigError::ZeroThreshold {
                name: "failure_threshold",
            });
        }
        if self.success_threshold == 0 {
            return Err(ConfigError::ZeroThreshold {
                name: "success_threshold",
            });
        }
        check_period("open_period_secs", self.open_period_secs)?;
        check_period("counter_reset_secs", self.counter_reset_secs)?;
        Ok(())
    }
}

fn check_period(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidPeriod { name, value })
    }
}

/// Circuit breaker public API
///
/// All methods take `&self`; share one breaker between threads with `Arc`.
pub struct CircuitBreaker {
    name: String,
    config: Config,
    counter: OutcomeCounter,
    state: BreakerState,
    logger: Arc<dyn Logger>,
    blocked: AtomicBool,
}

impl CircuitBreaker {
    /// Create a new circuit breaker (use builder() for more options)
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`Config::validate`].
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        crate::builder::CircuitBuilder::new(name).config(config).build()
    }

    /// Create a new circuit breaker builder
    pub fn builder(name: impl Into<String>) -> crate::builder::CircuitBuilder {
        crate::builder::CircuitBuilder::new(name)
    }

    /// Assemble a breaker from validated parts (used by builder)
    pub(crate) fn from_parts(
        name: String,
        config: Config,
        logger: Arc<dyn Logger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let counter = OutcomeCounter::new(config.counter_reset_secs, Arc::clone(&clock));
        let state = BreakerState::new(config.open_period_secs, clock);

        Self {
            name,
            config,
            counter,
            state,
            logger,
            blocked: AtomicBool::new(false),
        }
    }

    /// Execute a fallible operation with circuit breaker protection
    ///
    /// The operation's own error is always handed back as
    /// [`CircuitError::Operation`] after bookkeeping. While Open or blocked the
    /// operation is not run at all.
    #[doc(alias = "exec")]
    pub fn call<T, E, F>(&self, operation: F) -> Result<T, CircuitError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        if self.blocked.load(Ordering::Acquire) {
            self.logger
                .debug("request rejected, circuit is blocked", &[("service", &self.name)]);
            return Err(CircuitError::Blocked {
                circuit: self.name.clone(),
            });
        }

        match self.current_status() {
            Status::Open => {
                self.logger.debug(
                    "request rejected, circuit is open",
                    &[("service", &self.name), ("status", &Status::Open)],
                );
                Err(CircuitError::RequestDisabled {
                    circuit: self.name.clone(),
                })
            }
            Status::Closed => match operation() {
                Ok(value) => {
                    self.counter.record_success();
                    Ok(value)
                }
                Err(e) => {
                    self.handle_failure(Status::Closed, &e);
                    Err(CircuitError::Operation(e))
                }
            },
            Status::HalfOpen => match operation() {
                Ok(value) => {
                    let successes = self.counter.record_success();
                    if successes > self.config.success_threshold {
                        self.logger.info(
                            "circuit recovered, closing",
                            &[
                                ("service", &self.name),
                                ("successes", &successes),
                                ("success_threshold", &self.config.success_threshold),
                            ],
                        );
                        self.state.set(Status::Closed);
                    }
                    Ok(value)
                }
                Err(e) => {
                    self.handle_failure(Status::HalfOpen, &e);
                    Err(CircuitError::Operation(e))
                }
            },
        }
    }

    /// Read the effective status, reporting a lazy Open → HalfOpen promotion
    fn current_status(&self) -> Status {
        let (status, promoted) = self.state.observe();
        if promoted {
            self.logger.debug(
                "open period elapsed, entering half-open state",
                &[
                    ("service", &self.name),
                    ("open_period_secs", &self.config.open_period_secs),
                ],
            );
        }
        status
    }

    /// Log, count, and open the circuit when the failure is disqualifying
    fn handle_failure(&self, status: Status, error: &dyn fmt::Display) {
        self.logger.error(
            "request failed",
            &[("service", &self.name), ("status", &status), ("error", error)],
        );

        let failures = self.counter.record_failure();
        // A single HalfOpen failure is enough to reopen
        if status == Status::HalfOpen || failures > self.config.failure_threshold {
            self.logger.info(
                "entering open state",
                &[
                    ("service", &self.name),
                    ("from", &status),
                    ("failures", &failures),
                    ("failure_threshold", &self.config.failure_threshold),
                    ("open_period_secs", &self.config.open_period_secs),
                ],
            );
            self.state.set(Status::Open);
        }
    }

    /// Return to the power-on condition: Closed, zero streaks, unblocked
    pub fn reset(&self) {
        self.counter.reset();
        self.state.reset();
        self.blocked.store(false, Ordering::Release);
        self.logger.info("circuit reset", &[("service", &self.name)]);
    }

    /// Reject every call with [`CircuitError::Blocked`] until [`unblock`](Self::unblock)
    pub fn block(&self) {
        self.blocked.store(true, Ordering::Release);
        self.logger.info("circuit blocked", &[("service", &self.name)]);
    }

    /// Resume normal operation after [`block`](Self::block)
    pub fn unblock(&self) {
        self.blocked.store(false, Ordering::Release);
        self.logger.info("circuit unblocked", &[("service", &self.name)]);
    }

    /// Check if the manual override is engaged
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Effective status, including lazy Open → HalfOpen promotion
    pub fn status(&self) -> Status {
        self.current_status()
    }

    /// Check if circuit is open
    pub fn is_open(&self) -> bool {
        self.status() == Status::Open
    }

    /// Check if circuit is closed
    pub fn is_closed(&self) -> bool {
        self.status() == Status::Closed
    }

    /// Check if circuit is half-open (probing)
    pub fn is_half_open(&self) -> bool {
        self.status() == Status::HalfOpen
    }

    /// Get current state name
    pub fn state_name(&self) -> &'static str {
        self.status().as_str()
    }

    /// Service name used for labeling
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration the breaker was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current consecutive failure streak
    pub fn consecutive_failures(&self) -> u32 {
        self.counter.failures()
    }

    /// Current consecutive success streak
    pub fn consecutive_successes(&self) -> u32 {
        self.counter.successes()
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::from_parts(
            String::new(),
            Config::default(),
            Arc::new(NoopLogger),
            Arc::new(MonotonicClock::new()),
        )
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("counter", &self.counter)
            .field("state", &self.state)
            .field("logger", &self.logger)
            .field("blocked", &self.is_blocked())
            .finish()
    }
}
