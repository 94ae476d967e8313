//! Logging sinks for circuit breaker events
//!
//! This module provides different logger implementations:
//! - `NoopLogger`: Discards everything, used when nothing is wired in
//! - `TracingLogger`: Forwards events to the `tracing` ecosystem
//!
//! The breaker never depends on a logger for correctness; sinks are notified
//! after bookkeeping and must not block.

use std::fmt;

/// Auxiliary key/value attached to a log record
pub type Field<'a> = (&'static str, &'a dyn fmt::Display);

/// Sink notified about failures and state transitions
pub trait Logger: Send + Sync + fmt::Debug {
    /// Fine-grained detail (rejections, lazy promotions)
    fn debug(&self, message: &str, fields: &[Field<'_>]);

    /// Operation failures
    fn error(&self, message: &str, fields: &[Field<'_>]);

    /// Notable transitions and manual control
    fn info(&self, message: &str, fields: &[Field<'_>]);
}

/// Logger that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str, _fields: &[Field<'_>]) {}

    fn error(&self, _message: &str, _fields: &[Field<'_>]) {}

    fn info(&self, _message: &str, _fields: &[Field<'_>]) {}
}

/// Logger that emits `tracing` events under the `circuit_breaker` target
///
/// # Example
///
/// ```rust
/// use circuit_breaker::{CircuitBreaker, TracingLogger};
/// use std::sync::Arc;
///
/// let breaker = CircuitBreaker::builder("payments")
///     .logger(Arc::new(TracingLogger))
///     .build();
/// # let _ = breaker;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, fields: &[Field<'_>]) {
        tracing::debug!(
            target: "circuit_breaker",
            service = %service(fields),
            "{}{}",
            message,
            Fields::without(fields, "service")
        );
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        tracing::error!(
            target: "circuit_breaker",
            service = %service(fields),
            "{}{}",
            message,
            Fields::without(fields, "service")
        );
    }

    fn info(&self, message: &str, fields: &[Field<'_>]) {
        tracing::info!(
            target: "circuit_breaker",
            service = %service(fields),
            "{}{}",
            message,
            Fields::without(fields, "service")
        );
    }
}

/// Value of the `service` field, empty when absent
fn service<'a>(fields: &'a [Field<'_>]) -> &'a dyn fmt::Display {
    fields
        .iter()
        .find(|(key, _)| *key == "service")
        .map(|(_, value)| *value)
        .unwrap_or(&"")
}

/// Renders fields as ` key=value key=value`
pub(crate) struct Fields<'a, 'b> {
    fields: &'a [Field<'b>],
    skip: Option<&'static str>,
}

impl<'a, 'b> Fields<'a, 'b> {
    /// Render every field except `key`
    pub(crate) fn without(fields: &'a [Field<'b>], key: &'static str) -> Self {
        Self {
            fields,
            skip: Some(key),
        }
    }
}

impl fmt::Display for Fields<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.fields {
            if Some(*key) == self.skip {
                continue;
            }
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}
