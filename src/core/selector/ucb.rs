//! UCB1 scoring
//!
//! `score = avg_reward + c * sqrt(ln(total_pulls) / pulls)`, and `+inf` for an
//! arm that has never been pulled so it is always tried first.

use super::metrics::ModelMetrics;
use crate::config::RewardConfig;
use crate::utils::{clamp01, normalize};

/// UCB1 scorer with a blended reward
#[derive(Debug, Clone)]
pub struct Ucb1 {
    exploration_constant: f64,
    reward: RewardConfig,
}

impl Ucb1 {
    pub fn new(exploration_constant: f64, reward: RewardConfig) -> Self {
        Self {
            exploration_constant: exploration_constant.max(0.0),
            reward,
        }
    }

    /// Average reward in `[0, 1]`
    ///
    /// Success rate dominates; latency and cost are penalties normalized
    /// against their ceilings. With no successful run the latency term is
    /// fully penalized.
    pub fn average_reward(&self, metrics: &ModelMetrics) -> f64 {
        let r = &self.reward;
        let total_weight = r.success_weight + r.latency_weight + r.cost_weight;
        if total_weight <= 0.0 {
            return metrics.success_rate();
        }

        let latency_term = if metrics.successes == 0 {
            0.0
        } else {
            1.0 - normalize(metrics.avg_response_time(), r.latency_ceiling_secs)
        };
        let cost_term = 1.0 - normalize(metrics.avg_cost(), r.cost_ceiling);

        clamp01(
            (r.success_weight * metrics.success_rate()
                + r.latency_weight * latency_term
                + r.cost_weight * cost_term)
                / total_weight,
        )
    }

    /// Upper confidence bound for one arm
    pub fn score(&self, metrics: &ModelMetrics, total_pulls: u64) -> f64 {
        if metrics.pulls == 0 {
            return f64::INFINITY;
        }
        let total = total_pulls.max(metrics.pulls).max(1) as f64;
        let bonus = self.exploration_constant * (total.ln() / metrics.pulls as f64).sqrt();
        self.average_reward(metrics) + bonus
    }
}

impl Default for Ucb1 {
    fn default() -> Self {
        Self::new(2.0, RewardConfig::default())
    }
}
