//! Per-provider running statistics and health scoring

use crate::config::HealthConfig;
use crate::utils::{clamp01, normalize};
use serde::Serialize;
use std::collections::VecDeque;

/// One observed request, kept for the recent-performance window
#[derive(Debug, Clone, Copy)]
struct Observation {
    success: bool,
    latency_secs: f64,
}

/// Performance over the last few observations only
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecentPerformance {
    /// Share of successful requests in the window
    pub success_rate: f64,
    /// Mean latency in seconds across the window
    pub avg_latency: f64,
    /// Number of observations in the window
    pub count: usize,
}

/// Running statistics for a single provider
///
/// `reliability_score` is always `success_count / total_requests`. The
/// latency EWMA starts at a pessimistic prior so that untested providers do
/// not outrank proven ones.
#[derive(Debug, Clone)]
pub struct ProviderMetrics {
    pub ewma_latency: f64,
    pub success_count: u64,
    pub error_count: u64,
    pub total_requests: u64,
    /// Seconds, successful requests only
    pub total_response_time: f64,
    /// Successful requests only
    pub total_cost: f64,
    pub cost_per_request: f64,
    pub health_score: f64,
    pub availability_score: f64,
    pub reliability_score: f64,
    recent: VecDeque<Observation>,
    config: HealthConfig,
}

impl ProviderMetrics {
    /// Fresh metrics for an untested provider
    pub fn new(config: HealthConfig) -> Self {
        let mut metrics = Self {
            ewma_latency: clamp01(config.initial_ewma_latency),
            success_count: 0,
            error_count: 0,
            total_requests: 0,
            total_response_time: 0.0,
            total_cost: 0.0,
            cost_per_request: 0.0,
            health_score: 0.0,
            availability_score: 1.0,
            reliability_score: 0.0,
            recent: VecDeque::with_capacity(config.recent_window),
            config,
        };
        metrics.recompute_health();
        metrics
    }

    /// Fold one request outcome into the statistics
    pub fn update_request(&mut self, success: bool, latency_secs: f64, cost: f64) {
        let latency_secs = if latency_secs.is_finite() {
            latency_secs.max(0.0)
        } else {
            self.config.latency_ceiling_secs
        };
        let cost = if cost.is_finite() { cost.max(0.0) } else { 0.0 };

        self.total_requests += 1;
        if success {
            self.success_count += 1;
            self.total_response_time += latency_secs;
            self.total_cost += cost;
            self.cost_per_request = self.total_cost / self.success_count as f64;
        } else {
            self.error_count += 1;
        }

        let normalized = normalize(latency_secs, self.config.latency_ceiling_secs);
        let alpha = self.config.ewma_alpha;
        self.ewma_latency = clamp01(alpha * normalized + (1.0 - alpha) * self.ewma_latency);

        if self.recent.len() >= self.config.recent_window.max(1) {
            self.recent.pop_front();
        }
        self.recent.push_back(Observation {
            success,
            latency_secs,
        });

        self.reliability_score = self.success_count as f64 / self.total_requests as f64;
        self.recompute_health();
    }

    fn recompute_health(&mut self) {
        let HealthConfig {
            reliability_weight,
            latency_weight,
            ..
        } = self.config;
        let total_weight = reliability_weight + latency_weight;
        let blended = if total_weight > 0.0 {
            (reliability_weight * self.reliability_score
                + latency_weight * (1.0 - self.ewma_latency))
                / total_weight
        } else {
            self.reliability_score
        };
        self.health_score = clamp01(blended);

        self.availability_score = if self.recent.is_empty() {
            1.0
        } else {
            self.recent_performance().success_rate
        };
    }

    /// Success rate and latency over the last `recent_window` observations
    pub fn recent_performance(&self) -> RecentPerformance {
        let count = self.recent.len();
        if count == 0 {
            return RecentPerformance {
                success_rate: 0.0,
                avg_latency: 0.0,
                count: 0,
            };
        }

        let successes = self.recent.iter().filter(|o| o.success).count();
        let latency: f64 = self.recent.iter().map(|o| o.latency_secs).sum();
        RecentPerformance {
            success_rate: successes as f64 / count as f64,
            avg_latency: latency / count as f64,
            count,
        }
    }

    /// Mean latency of successful requests, in seconds
    pub fn avg_response_time(&self) -> f64 {
        if self.success_count == 0 {
            0.0
        } else {
            self.total_response_time / self.success_count as f64
        }
    }
}
