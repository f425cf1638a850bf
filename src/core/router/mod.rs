//! Provider routing: health tracking, circuit breaking and strategies
//!
//! ## Module Structure
//!
//! - `provider` - The narrow provider view the router reads from
//! - `metrics` - Per-provider running statistics and health score
//! - `circuit_breaker` - Per-provider failure isolation
//! - `strategy` - Strategy enum and candidate ranking
//! - `load_balancer` - Provider registry and selection

pub mod circuit_breaker;
pub mod load_balancer;
pub mod metrics;
pub mod provider;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use circuit_breaker::{CircuitBreaker, CircuitState};
pub use load_balancer::{LoadBalancer, LoadBalancerStats, ProviderStats};
pub use metrics::{ProviderMetrics, RecentPerformance};
pub use provider::{ActiveRequestGuard, ProviderCapability, ProviderHandle, ProviderProfile};
pub use strategy::{Candidate, Strategy, StrategyExecutor};
