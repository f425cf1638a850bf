//! Load balancer configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

impl Validate for LoadBalancerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating load balancer configuration");

        self.circuit_breaker.validate()?;
        self.health.validate()?;

        let mut seen = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !seen.insert(provider.name.as_str()) {
                return Err(format!("Duplicate provider '{}'", provider.name));
            }
        }

        for (tier, members) in &self.cost_optimization_tiers {
            if tier.trim().is_empty() {
                return Err("Cost tier names cannot be empty".to_string());
            }
            if members.iter().any(|m| m.trim().is_empty()) {
                return Err(format!("Cost tier '{}' lists an empty provider name", tier));
            }
        }

        Ok(())
    }
}

impl Validate for CircuitBreakerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_failures == 0 {
            return Err("Circuit breaker max failures must be greater than 0".to_string());
        }

        if !self.timeout_secs.is_finite() || self.timeout_secs < 0.0 {
            return Err("Circuit breaker timeout must be a non-negative number".to_string());
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        if !(self.ewma_alpha > 0.0 && self.ewma_alpha <= 1.0) {
            return Err(format!(
                "EWMA alpha must be in (0, 1], got {}",
                self.ewma_alpha
            ));
        }

        if !(self.latency_ceiling_secs > 0.0) {
            return Err("Latency ceiling must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.initial_ewma_latency) {
            return Err("Initial EWMA latency must be in [0, 1]".to_string());
        }

        if self.reliability_weight < 0.0 || self.latency_weight < 0.0 {
            return Err("Health weights cannot be negative".to_string());
        }

        if self.reliability_weight + self.latency_weight <= 0.0 {
            return Err("Health weights must not both be zero".to_string());
        }

        if self.recent_window == 0 {
            return Err("Recent performance window must be greater than 0".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_health_score) {
            return Err("Minimum health score must be in [0, 1]".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderProfileConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Provider name cannot be empty".to_string());
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(format!(
                "Provider '{}' weight must be a non-negative number",
                self.name
            ));
        }

        Ok(())
    }
}
