//! Error types for circuit breaker operations

use std::error::Error;

/// Errors returned from [`CircuitBreaker::call`](crate::CircuitBreaker::call)
#[derive(Debug, thiserror::Error)]
pub enum CircuitError<E = Box<dyn Error + Send + Sync>> {
    /// Circuit is open, the operation was not attempted
    #[error("requests to '{circuit}' are temporarily disabled by the circuit breaker")]
    RequestDisabled { circuit: String },
    /// Circuit is manually blocked, the operation was not attempted
    #[error("circuit breaker '{circuit}' is blocking all requests, call unblock() to resume")]
    Blocked { circuit: String },
    /// The wrapped operation failed
    #[error("operation failed: {0}")]
    Operation(#[source] E),
}

impl<E> CircuitError<E> {
    /// True when the breaker refused to run the operation
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            CircuitError::RequestDisabled { .. } | CircuitError::Blocked { .. }
        )
    }

    /// The operation's own failure, if it ran
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            CircuitError::Operation(e) => Some(e),
            _ => None,
        }
    }

    /// Take the operation's own failure, if it ran
    pub fn into_operation_error(self) -> Option<E> {
        match self {
            CircuitError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// Invalid construction parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be greater than 0")]
    ZeroThreshold { name: &'static str },
    #[error("{name} must be a finite number of seconds greater than 0, got {value}")]
    InvalidPeriod { name: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn test_display_messages() {
        let disabled: CircuitError<Refused> = CircuitError::RequestDisabled {
            circuit: "api".to_string(),
        };
        assert_eq!(
            disabled.to_string(),
            "requests to 'api' are temporarily disabled by the circuit breaker"
        );

        let blocked: CircuitError<Refused> = CircuitError::Blocked {
            circuit: "api".to_string(),
        };
        assert!(blocked.to_string().contains("unblock()"));

        let failed = CircuitError::Operation(Refused);
        assert_eq!(failed.to_string(), "operation failed: connection refused");
    }

    #[test]
    fn test_source_is_operation_error() {
        let failed = CircuitError::Operation(Refused);
        let source = failed.source().expect("operation error should be the source");
        assert_eq!(source.to_string(), "connection refused");

        let disabled: CircuitError<Refused> = CircuitError::RequestDisabled {
            circuit: "api".to_string(),
        };
        assert!(disabled.source().is_none());
    }

    #[test]
    fn test_rejection_helpers() {
        let blocked: CircuitError<&str> = CircuitError::Blocked {
            circuit: "api".to_string(),
        };
        assert!(blocked.is_rejected());
        assert!(blocked.operation_error().is_none());

        let failed: CircuitError<&str> = CircuitError::Operation("boom");
        assert!(!failed.is_rejected());
        assert_eq!(failed.operation_error(), Some(&"boom"));
        assert_eq!(failed.into_operation_error(), Some("boom"));
    }
}
