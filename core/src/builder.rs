//! Builder API for ergonomic circuit breaker configuration

use crate::{
    circuit::{CircuitBreaker, Config},
    clock::{Clock, MonotonicClock},
    errors::ConfigError,
    logger::{Logger, NoopLogger},
};
use std::sync::Arc;

/// Builder for creating circuit breakers with fluent API
pub struct CircuitBuilder {
    name: String,
    config: Config,
    logger: Option<Arc<dyn Logger>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CircuitBuilder {
    /// Create a new builder for a circuit with the given service name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: Config::default(),
            logger: None,
            clock: None,
        }
    }

    /// Replace the whole configuration at once
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the number of consecutive failures that must be exceeded to open the circuit
    pub fn failure_threshold(mut self, threshold: u32) -> Self {
        self.config.failure_threshold = threshold;
        self
    }

    /// Set the number of consecutive HalfOpen successes that must be exceeded to close it
    pub fn success_threshold(mut self, threshold: u32) -> Self {
        self.config.success_threshold = threshold;
        self
    }

    /// Set how long the circuit stays Open before allowing a trial request
    pub fn open_period_secs(mut self, seconds: f64) -> Self {
        self.config.open_period_secs = seconds;
        self
    }

    /// Set the idle period after which a success or failure streak restarts
    pub fn counter_reset_secs(mut self, seconds: f64) -> Self {
        self.config.counter_reset_secs = seconds;
        self
    }

    /// Set the logging sink (defaults to [`NoopLogger`])
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Set the time source (defaults to [`MonotonicClock`])
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the circuit breaker, rejecting invalid configuration
    pub fn try_build(self) -> Result<CircuitBreaker, ConfigError> {
        self.config.validate()?;

        let logger = self.logger.unwrap_or_else(|| Arc::new(NoopLogger));
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));

        Ok(CircuitBreaker::from_parts(
            self.name,
            self.config,
            logger,
            clock,
        ))
    }

    /// Build the circuit breaker
    ///
    /// # Panics
    ///
    /// Panics if a threshold is 0 or a period is not a positive, finite number of
    /// seconds. Use [`try_build`](Self::try_build) to handle that as an error.
    pub fn build(self) -> CircuitBreaker {
        match self.try_build() {
            Ok(circuit) => circuit,
            Err(e) => panic!("invalid circuit breaker configuration: {}", e),
        }
    }
}

impl std::fmt::Debug for CircuitBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("logger", &self.logger)
            .field("clock", &self.clock)
            .finish()
    }
}
