//! Load balancer configuration

use super::*;
use crate::core::router::provider::{ProviderCapability, ProviderProfile};
use crate::core::router::strategy::Strategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Load balancer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerConfig {
    /// Routing strategy; unknown names fall back to `WEIGHTED_ROUND_ROBIN`
    #[serde(default)]
    pub strategy: Strategy,
    /// Tier name -> provider names, consulted by `COST_OPTIMIZED`
    #[serde(default, alias = "costOptimizationTiers")]
    pub cost_optimization_tiers: HashMap<String, Vec<String>>,
    /// Circuit breaker configuration
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
    /// Health scoring configuration
    #[serde(default)]
    pub health: HealthConfig,
    /// Providers to register up front
    #[serde(default)]
    pub providers: Vec<ProviderProfileConfig>,
}

/// Circuit breaker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Failures that open the circuit
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
    /// Seconds an open circuit waits before allowing a probe
    #[serde(default = "default_breaker_timeout_secs")]
    pub timeout_secs: f64,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            max_failures: default_max_failures(),
            timeout_secs: default_breaker_timeout_secs(),
        }
    }
}

impl CircuitBreakerConfig {
    /// Open-circuit cool-down as a `Duration`
    ///
    /// Values too large for a `Duration` saturate to `Duration::MAX`.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs.max(0.0)).unwrap_or(Duration::MAX)
    }
}

/// Health scoring configuration
///
/// `health = reliability_weight * reliability + latency_weight * (1 - ewma_latency)`,
/// clamped to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Latency (seconds) that normalizes to 1.0
    #[serde(default = "default_latency_ceiling_secs")]
    pub latency_ceiling_secs: f64,
    /// EWMA smoothing factor in `(0, 1]`
    #[serde(default = "default_ewma_alpha")]
    pub ewma_alpha: f64,
    /// Starting EWMA value for untested providers
    #[serde(default = "default_initial_ewma_latency")]
    pub initial_ewma_latency: f64,
    /// Weight of the success ratio in the health blend
    #[serde(default = "default_half_weight")]
    pub reliability_weight: f64,
    /// Weight of inverse latency in the health blend
    #[serde(default = "default_half_weight")]
    pub latency_weight: f64,
    /// Observations kept for recent-performance queries
    #[serde(default = "default_recent_window")]
    pub recent_window: usize,
    /// Providers below this score are skipped unless nothing else is left
    #[serde(default = "default_min_health_score")]
    pub min_health_score: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            latency_ceiling_secs: default_latency_ceiling_secs(),
            ewma_alpha: default_ewma_alpha(),
            initial_ewma_latency: default_initial_ewma_latency(),
            reliability_weight: default_half_weight(),
            latency_weight: default_half_weight(),
            recent_window: default_recent_window(),
            min_health_score: default_min_health_score(),
        }
    }
}

/// Static description of a provider, turned into a [`ProviderProfile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfileConfig {
    /// Provider name
    pub name: String,
    /// Priority (lower value = higher priority)
    #[serde(default)]
    pub priority: u32,
    /// Weight for weighted selection
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Advertised capabilities
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<ProviderCapability>,
}

fn default_capabilities() -> Vec<ProviderCapability> {
    vec![ProviderCapability::Chat]
}

impl ProviderProfileConfig {
    /// Build the runtime handle
    pub fn to_profile(&self) -> ProviderProfile {
        ProviderProfile::new(self.name.clone())
            .with_priority(self.priority)
            .with_weight(self.weight)
            .with_capabilities(self.capabilities.clone())
    }
}

impl LoadBalancerConfig {
    /// Runtime handles for every configured provider, keyed by name
    pub fn provider_profiles(&self) -> HashMap<String, ProviderProfile> {
        self.providers
            .iter()
            .map(|p| (p.name.clone(), p.to_profile()))
            .collect()
    }
}
