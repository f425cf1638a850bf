//! Read-only load balancer statistics

use super::core::LoadBalancer;
use crate::core::router::circuit_breaker::CircuitState;
use crate::core::router::metrics::RecentPerformance;
use crate::core::router::strategy::Strategy;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Snapshot of one provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderStats {
    pub name: String,
    pub health_score: f64,
    pub availability_score: f64,
    pub reliability_score: f64,
    pub ewma_latency: f64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_requests: u64,
    /// Seconds, successful requests only
    pub avg_response_time: f64,
    pub total_cost: f64,
    pub cost_per_request: f64,
    pub circuit_state: CircuitState,
    pub failure_count: u32,
    pub recent: RecentPerformance,
}

/// Snapshot of the whole load balancer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadBalancerStats {
    pub strategy: Strategy,
    pub total_providers: usize,
    /// Providers whose circuit is not open
    pub available_providers: usize,
    pub open_circuits: usize,
    pub total_requests: u64,
    pub overall_success_rate: f64,
    pub total_cost: f64,
    pub cost_tiers: HashMap<String, Vec<String>>,
    pub providers: BTreeMap<String, ProviderStats>,
}

impl LoadBalancer {
    /// Statistics for one provider, or `None` if it is not registered
    pub fn get_provider_stats(&self, name: &str) -> Option<ProviderStats> {
        let entry = self.entry(name)?;
        let metrics = entry.metrics.read();
        let breaker = entry.breaker.lock();

        Some(ProviderStats {
            name: name.to_string(),
            health_score: metrics.health_score,
            availability_score: metrics.availability_score,
            reliability_score: metrics.reliability_score,
            ewma_latency: metrics.ewma_latency,
            success_count: metrics.success_count,
            error_count: metrics.error_count,
            total_requests: metrics.total_requests,
            avg_response_time: metrics.avg_response_time(),
            total_cost: metrics.total_cost,
            cost_per_request: metrics.cost_per_request,
            circuit_state: breaker.state(),
            failure_count: breaker.failure_count(),
            recent: metrics.recent_performance(),
        })
    }

    /// Aggregate statistics across all registered providers
    pub fn get_load_balancer_stats(&self) -> LoadBalancerStats {
        let providers: BTreeMap<String, ProviderStats> = self
            .registered_providers()
            .into_iter()
            .filter_map(|name| self.get_provider_stats(&name).map(|s| (name, s)))
            .collect();

        let open_circuits = providers
            .values()
            .filter(|s| s.circuit_state == CircuitState::Open)
            .count();
        let total_requests: u64 = providers.values().map(|s| s.total_requests).sum();
        let successes: u64 = providers.values().map(|s| s.success_count).sum();

        LoadBalancerStats {
            strategy: self.strategy(),
            total_providers: providers.len(),
            available_providers: providers.len() - open_circuits,
            open_circuits,
            total_requests,
            overall_success_rate: if total_requests == 0 {
                0.0
            } else {
                successes as f64 / total_requests as f64
            },
            total_cost: providers.values().map(|s| s.total_cost).sum(),
            cost_tiers: self.cost_tiers(),
            providers,
        }
    }
}
