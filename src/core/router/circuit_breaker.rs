//! Per-provider circuit breaker
//!
//! A plain state machine; the owning load balancer guards each instance with
//! its own lock.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Circuit breaker state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Requests flow normally
    Closed,
    /// Requests are rejected until the timeout elapses
    Open,
    /// One probing request is allowed through
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            CircuitState::Closed => "closed",
            CircuitState::Open => "open",
            CircuitState::HalfOpen => "half_open",
        })
    }
}

/// Closed -> Open -> HalfOpen -> Closed/Open failure isolation
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    state: CircuitState,
    failure_count: u32,
    max_failures: u32,
    timeout: Duration,
    last_failure_time: Option<Instant>,
    /// When the current half-open probe was handed out
    probe_granted_at: Option<Instant>,
}

impl CircuitBreaker {
    /// Create a closed breaker
    pub fn new(max_failures: u32, timeout: Duration) -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            max_failures: max_failures.max(1),
            timeout,
            last_failure_time: None,
            probe_granted_at: None,
        }
    }

    /// Whether requests must be kept away from this provider
    ///
    /// Once the timeout has elapsed an open circuit turns half-open and this
    /// returns `false` exactly once, granting a single probe. Further calls
    /// return `true` until the probe's outcome is recorded, or until another
    /// full timeout passes without one.
    pub fn is_open(&mut self) -> bool {
        match self.state {
            CircuitState::Closed => false,
            CircuitState::Open => {
                let expired = self
                    .last_failure_time
                    .is_none_or(|at| at.elapsed() >= self.timeout);
                if expired {
                    debug!("Circuit breaker transitioning from Open to HalfOpen");
                    self.state = CircuitState::HalfOpen;
                    self.probe_granted_at = Some(Instant::now());
                    false
                } else {
                    true
                }
            }
            CircuitState::HalfOpen => match self.probe_granted_at {
                Some(at) if at.elapsed() < self.timeout => true,
                _ => {
                    // The previous probe never reported back
                    self.probe_granted_at = Some(Instant::now());
                    false
                }
            },
        }
    }

    /// Record a successful request
    pub fn record_success(&mut self) {
        if self.state == CircuitState::HalfOpen {
            debug!("Circuit breaker transitioning from HalfOpen to Closed");
            self.state = CircuitState::Closed;
            self.failure_count = 0;
            self.last_failure_time = None;
            self.probe_granted_at = None;
        }
    }

    /// Record a failed request
    pub fn record_failure(&mut self) {
        self.failure_count = self.failure_count.saturating_add(1);
        let now = Instant::now();

        match self.state {
            CircuitState::Closed => {
                if self.failure_count >= self.max_failures {
                    warn!(
                        "Circuit breaker opening after {} failures",
                        self.failure_count
                    );
                    self.state = CircuitState::Open;
                    self.last_failure_time = Some(now);
                }
            }
            CircuitState::HalfOpen => {
                debug!("Circuit breaker transitioning from HalfOpen to Open due to failure");
                self.state = CircuitState::Open;
                self.last_failure_time = Some(now);
                self.probe_granted_at = None;
            }
            // Late outcomes restart the cool-down
            CircuitState::Open => self.last_failure_time = Some(now),
        }
    }

    /// Current state, without triggering the lazy Open -> HalfOpen transition
    pub fn state(&self) -> CircuitState {
        self.state
    }

    /// Failures counted since the circuit last closed
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Configured failure threshold
    pub fn max_failures(&self) -> u32 {
        self.max_failures
    }

    /// Configured cool-down
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Return to a fresh closed state
    pub fn reset(&mut self) {
        *self = Self::new(self.max_failures, self.timeout);
        debug!("Circuit breaker reset");
    }
}
