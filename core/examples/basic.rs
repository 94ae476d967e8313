//! Basic circuit breaker usage example
//!
//! Run with `RUST_LOG=circuit_breaker=debug` to see the breaker's own events.

use circuit_breaker::{CircuitBreaker, CircuitError, TracingLogger};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Circuit Breaker Basic Example ===\n");

    let circuit = CircuitBreaker::builder("twitter-api")
        .failure_threshold(1)
        .success_threshold(2)
        .open_period_secs(2.0)
        .counter_reset_secs(60.0)
        .logger(Arc::new(TracingLogger))
        .build();

    println!("Initial state: {}\n", circuit.state_name());

    println!("--- Triggering failures ---");
    for i in 1..=3 {
        let request = move || Err::<String, _>(format!("timeline request {} timed out", i));
        match circuit.call(request) {
            Ok(_) => println!("✓ Success"),
            Err(CircuitError::RequestDisabled { .. }) => println!("✗ rejected, circuit is open"),
            Err(e) => println!("✗ {}", e),
        }
    }
    println!("State: {}\n", circuit.state_name());

    println!("--- Waiting for the open period to pass ---");
    std::thread::sleep(Duration::from_millis(2100));
    println!("State: {}\n", circuit.state_name());

    println!("--- Probing ---");
    for i in 1..=3 {
        match circuit.call(move || Ok::<_, String>(format!("timeline page {}", i))) {
            Ok(result) => println!("✓ {}", result),
            Err(e) => println!("✗ {}", e),
        }
        println!("State: {}", circuit.state_name());
    }
    println!();

    println!("--- Manual block ---");
    circuit.block();
    match circuit.call(|| Ok::<_, String>("should be rejected".to_string())) {
        Ok(_) => println!("✓ Success"),
        Err(e) => println!("✗ {}", e),
    }
    circuit.reset();
    println!(
        "State after reset: {} (blocked: {})",
        circuit.state_name(),
        circuit.is_blocked()
    );
}
