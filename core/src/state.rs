//! Breaker lifecycle using state machines
//!
//! The lifecycle itself only knows which transitions are legal and when the open
//! period has run out. Deciding *when* to trip or close is left to the caller.

use crate::{
    Status,
    clock::{Clock, MonotonicClock},
};
use state_machines::state_machine;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Context shared by every lifecycle state
#[derive(Clone)]
pub struct StateContext {
    /// Seconds the breaker stays Open before a trial request is allowed
    pub open_period_secs: f64,
    pub clock: Arc<dyn Clock>,
}

impl Default for StateContext {
    fn default() -> Self {
        Self {
            open_period_secs: 60.0,
            clock: Arc::new(MonotonicClock::new()),
        }
    }
}

impl std::fmt::Debug for StateContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContext")
            .field("open_period_secs", &self.open_period_secs)
            .field("clock", &self.clock)
            .finish()
    }
}

/// Data specific to the Open state
#[derive(Debug, Clone, Default)]
pub struct OpenData {
    pub opened_at: f64,
}

state_machine! {
    name: Lifecycle,
    context: StateContext,
    dynamic: true,

    initial: Closed,
    states: [
        Closed,
        Open(OpenData),
        HalfOpen,
    ],
    events {
        trip {
            transition: { from: [Closed, HalfOpen], to: Open }
        }
        attempt_reset {
            guards: [open_period_elapsed],
            transition: { from: Open, to: HalfOpen }
        }
        close {
            transition: { from: HalfOpen, to: Closed }
        }
    }
}

impl Lifecycle<Open> {
    /// Check if the open period has run out (strictly longer than configured)
    fn open_period_elapsed(&self, ctx: &StateContext) -> bool {
        self.state_data_open()
            .is_some_and(|data| ctx.clock.monotonic_time() - data.opened_at > ctx.open_period_secs)
    }
}

fn status_of(state_name: &str) -> Status {
    match state_name {
        "Open" => Status::Open,
        "HalfOpen" => Status::HalfOpen,
        _ => Status::Closed,
    }
}

/// Thread-safe breaker status with lazy Open → HalfOpen promotion
pub struct BreakerState {
    machine: Mutex<DynamicLifecycle>,
    context: StateContext,
}

impl BreakerState {
    /// Create a Closed breaker state
    pub fn new(open_period_secs: f64, clock: Arc<dyn Clock>) -> Self {
        let context = StateContext {
            open_period_secs,
            clock,
        };

        Self {
            machine: Mutex::new(DynamicLifecycle::new(context.clone())),
            context,
        }
    }

    /// Effective status at the current time
    ///
    /// An Open breaker whose open period has elapsed reads as HalfOpen, and the
    /// promotion is stored so later reads agree without recomputing it.
    pub fn status(&self) -> Status {
        self.observe().0
    }

    /// Effective status, and whether this read performed the Open → HalfOpen promotion
    pub(crate) fn observe(&self) -> (Status, bool) {
        let mut machine = self.lock();
        // Guard rejection just means the open period is still running
        let promoted = machine.current_state() == "Open"
            && machine.handle(LifecycleEvent::AttemptReset).is_ok();
        (status_of(machine.current_state()), promoted)
    }

    /// Store `status` unconditionally
    ///
    /// Setting Open (including Open again) restarts the open period from now.
    pub fn set(&self, status: Status) {
        let mut machine = self.lock();
        let current = status_of(machine.current_state());

        match status {
            Status::Open => {
                if current != Status::Open {
                    let _ = machine.handle(LifecycleEvent::Trip);
                }
                if let Some(data) = machine.open_data_mut() {
                    data.opened_at = self.context.clock.monotonic_time();
                }
            }
            Status::HalfOpen => {
                if current == Status::Closed {
                    let _ = machine.handle(LifecycleEvent::Trip);
                }
                if let Some(data) = machine.open_data_mut() {
                    data.opened_at = f64::NEG_INFINITY;
                }
                let _ = machine.handle(LifecycleEvent::AttemptReset);
            }
            Status::Closed => {
                if current != Status::Closed
                    && machine.handle(LifecycleEvent::Close).is_err()
                {
                    // No event leads from Open to Closed; start a fresh machine instead
                    *machine = DynamicLifecycle::new(self.context.clone());
                }
            }
        }
    }

    /// Force Closed and forget any open period
    pub fn reset(&self) {
        *self.lock() = DynamicLifecycle::new(self.context.clone());
    }

    /// When the breaker last opened, if it is currently Open
    pub fn opened_at(&self) -> Option<f64> {
        self.lock().open_data().map(|data| data.opened_at)
    }

    /// Seconds the breaker stays Open before promotion
    pub fn open_period_secs(&self) -> f64 {
        self.context.open_period_secs
    }

    fn lock(&self) -> MutexGuard<'_, DynamicLifecycle> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BreakerState")
            .field("state", &self.lock().current_state())
            .field("context", &self.context)
            .finish()
    }
}
