//! Preset load balancer configurations

use super::core::LoadBalancer;
use crate::config::{CircuitBreakerConfig, HealthConfig, LoadBalancerConfig};
use crate::core::router::strategy::Strategy;
use std::collections::HashMap;

/// Tier names used when a cost-optimized preset is built without tiers
pub const DEFAULT_COST_TIERS: [&str; 3] = ["performance", "balanced", "economy"];

impl LoadBalancerConfig {
    /// Health-first routing for a single household or user
    pub fn single_user() -> Self {
        Self {
            strategy: Strategy::HealthBased,
            circuit_breaker: CircuitBreakerConfig {
                max_failures: 3,
                timeout_secs: 60.0,
            },
            ..Default::default()
        }
    }

    /// Forgiving settings for local experimentation
    pub fn development() -> Self {
        Self {
            strategy: Strategy::WeightedRoundRobin,
            circuit_breaker: CircuitBreakerConfig {
                max_failures: 10,
                timeout_secs: 10.0,
            },
            health: HealthConfig {
                min_health_score: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Tier-aware routing; an empty map yields empty default tiers
    pub fn cost_optimized(tiers: HashMap<String, Vec<String>>) -> Self {
        let tiers = if tiers.is_empty() {
            DEFAULT_COST_TIERS
                .iter()
                .map(|t| (t.to_string(), Vec::new()))
                .collect()
        } else {
            tiers
        };
        Self {
            strategy: Strategy::CostOptimized,
            cost_optimization_tiers: tiers,
            ..Default::default()
        }
    }
}

impl LoadBalancer {
    /// See [`LoadBalancerConfig::single_user`]
    pub fn single_user() -> Self {
        Self::from_config(&LoadBalancerConfig::single_user())
    }

    /// See [`LoadBalancerConfig::development`]
    pub fn development() -> Self {
        Self::from_config(&LoadBalancerConfig::development())
    }

    /// See [`LoadBalancerConfig::cost_optimized`]
    pub fn cost_optimized(tiers: HashMap<String, Vec<String>>) -> Self {
        Self::from_config(&LoadBalancerConfig::cost_optimized(tiers))
    }
}
