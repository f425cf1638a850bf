//! Configuration data models
//!
//! This module defines all configuration structures used by the router.

pub mod load_balancer;
pub mod logging;
pub mod selector;

// Re-export all configuration types
pub use load_balancer::*;
pub use logging::*;
pub use selector::*;

/// Default consecutive failures before a circuit opens
pub fn default_max_failures() -> u32 {
    3
}

/// Default open-circuit cool-down in seconds
pub fn default_breaker_timeout_secs() -> f64 {
    60.0
}

/// Default latency normalization ceiling in seconds
pub fn default_latency_ceiling_secs() -> f64 {
    15.0
}

/// Default EWMA smoothing factor
pub fn default_ewma_alpha() -> f64 {
    0.25
}

/// Default "untested" latency prior (normalized)
pub fn default_initial_ewma_latency() -> f64 {
    1.0
}

/// Default health-blend weight shared by reliability and latency
pub fn default_half_weight() -> f64 {
    0.5
}

/// Default size of the recent-performance ring buffer
pub fn default_recent_window() -> usize {
    20
}

/// Default health floor applied before ranking
pub fn default_min_health_score() -> f64 {
    0.1
}

/// Default provider weight
pub fn default_weight() -> f64 {
    1.0
}

/// Default warm-up trials per model and feature key
pub fn default_min_trials() -> u64 {
    3
}

/// Default UCB1 exploration constant
pub fn default_exploration_constant() -> f64 {
    2.0
}

/// Default per-request cost ceiling for reward normalization
pub fn default_cost_ceiling() -> f64 {
    0.05
}

/// Default prompt length (words) at or below which a request is simple
pub fn default_simple_word_limit() -> usize {
    20
}

/// Default prompt length (words) above which a request is complex
pub fn default_complex_word_limit() -> usize {
    150
}

/// Default log level
pub fn default_log_level() -> String {
    "info".to_string()
}
