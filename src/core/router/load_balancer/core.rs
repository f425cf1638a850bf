//! Core LoadBalancer struct and provider bookkeeping

use crate::config::{CircuitBreakerConfig, HealthConfig, LoadBalancerConfig};
use crate::core::router::circuit_breaker::CircuitBreaker;
use crate::core::router::metrics::ProviderMetrics;
use crate::core::router::strategy::{Strategy, StrategyExecutor};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// State owned for one provider; each half has its own lock
pub(super) struct ProviderEntry {
    pub(super) metrics: RwLock<ProviderMetrics>,
    pub(super) breaker: Mutex<CircuitBreaker>,
}

impl ProviderEntry {
    fn new(health: &HealthConfig, breaker: &CircuitBreakerConfig) -> Self {
        Self {
            metrics: RwLock::new(ProviderMetrics::new(health.clone())),
            breaker: Mutex::new(CircuitBreaker::new(breaker.max_failures, breaker.timeout())),
        }
    }
}

/// Load balancer for health-aware provider selection
///
/// Each provider's metrics and breaker sit behind their own locks, so updates
/// for one provider never block selection or updates for another.
pub struct LoadBalancer {
    /// Registered providers
    pub(super) providers: DashMap<String, Arc<ProviderEntry>>,
    /// Active strategy
    pub(super) strategy: RwLock<Strategy>,
    /// Tier name -> provider names
    pub(super) cost_tiers: RwLock<HashMap<String, Vec<String>>>,
    pub(super) health_config: HealthConfig,
    pub(super) breaker_config: CircuitBreakerConfig,
    /// Strategy executor
    pub(super) executor: StrategyExecutor,
}

impl LoadBalancer {
    /// Create a load balancer with default health and breaker settings
    pub fn new(strategy: Strategy) -> Self {
        Self::from_config(&LoadBalancerConfig {
            strategy,
            ..Default::default()
        })
    }

    /// Create a load balancer from configuration, registering listed providers
    pub fn from_config(config: &LoadBalancerConfig) -> Self {
        Self::build(config, StrategyExecutor::new())
    }

    /// Like [`LoadBalancer::from_config`] with a fixed seed for weighted picks
    pub fn with_seed(config: &LoadBalancerConfig, seed: u64) -> Self {
        Self::build(config, StrategyExecutor::with_seed(seed))
    }

    fn build(config: &LoadBalancerConfig, executor: StrategyExecutor) -> Self {
        info!(
            "Creating load balancer with strategy: {}",
            config.strategy
        );

        let lb = Self {
            providers: DashMap::new(),
            strategy: RwLock::new(config.strategy),
            cost_tiers: RwLock::new(config.cost_optimization_tiers.clone()),
            health_config: config.health.clone(),
            breaker_config: config.circuit_breaker.clone(),
            executor,
        };

        for provider in &config.providers {
            lb.register_provider(&provider.name);
        }
        lb
    }

    /// Start tracking `name`; returns `false` if it was already registered
    pub fn register_provider(&self, name: &str) -> bool {
        match self.providers.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(self.fresh_entry()));
                info!("Registered provider: {}", name);
                true
            }
        }
    }

    /// Stop tracking `name` and drop its statistics
    pub fn unregister_provider(&self, name: &str) -> bool {
        let removed = self.providers.remove(name).is_some();
        if removed {
            info!("Unregistered provider: {}", name);
        }
        removed
    }

    /// Whether `name` is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered provider names, sorted
    pub fn registered_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Forget all observations for `name`, closing its circuit
    pub fn reset_provider(&self, name: &str) -> bool {
        let Some(entry) = self.entry(name) else {
            return false;
        };
        *entry.metrics.write() = ProviderMetrics::new(self.health_config.clone());
        entry.breaker.lock().reset();
        info!("Reset provider: {}", name);
        true
    }

    /// Record the outcome of a request sent to `name`
    ///
    /// Unknown providers are registered on first use.
    pub fn update_provider_metrics(&self, name: &str, success: bool, latency_secs: f64, cost: f64) {
        let entry = match self.entry(name) {
            Some(entry) => entry,
            None => {
                debug!("Auto-registering provider on first update: {}", name);
                self.providers
                    .entry(name.to_string())
                    .or_insert_with(|| Arc::new(self.fresh_entry()))
                    .value()
                    .clone()
            }
        };

        entry
            .metrics
            .write()
            .update_request(success, latency_secs, cost);

        let mut breaker = entry.breaker.lock();
        if success {
            breaker.record_success();
        } else {
            breaker.record_failure();
        }

        debug!(
            provider = name,
            success,
            latency_secs,
            cost,
            circuit = %breaker.state(),
            "Updated provider metrics"
        );
    }

    /// Switch strategy; applies from the next selection
    pub fn set_strategy(&self, strategy: Strategy) {
        let mut current = self.strategy.write();
        if *current != strategy {
            info!("Routing strategy changed: {} -> {}", *current, strategy);
            *current = strategy;
        }
    }

    /// Active strategy
    pub fn strategy(&self) -> Strategy {
        *self.strategy.read()
    }

    /// Replace the cost tier map; applies from the next selection
    pub fn update_cost_tiers(&self, tiers: HashMap<String, Vec<String>>) {
        info!("Updated cost tiers: {:?}", tiers.keys().collect::<Vec<_>>());
        *self.cost_tiers.write() = tiers;
    }

    /// Current cost tier map
    pub fn cost_tiers(&self) -> HashMap<String, Vec<String>> {
        self.cost_tiers.read().clone()
    }

    pub(super) fn entry(&self, name: &str) -> Option<Arc<ProviderEntry>> {
        self.providers.get(name).map(|e| Arc::clone(e.value()))
    }

    fn fresh_entry(&self) -> ProviderEntry {
        ProviderEntry::new(&self.health_config, &self.breaker_config)
    }
}

impl Default for LoadBalancer {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

impl std::fmt::Debug for LoadBalancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadBalancer")
            .field("strategy", &self.strategy())
            .field("providers", &self.registered_providers())
            .finish()
    }
}
