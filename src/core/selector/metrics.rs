//! Per-model running statistics

use serde::{Deserialize, Serialize};

/// Statistics for one `(model, feature key)` arm
///
/// Field names match the persisted JSON layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub pulls: u64,
    pub successes: u64,
    /// Seconds, successful runs only
    #[serde(default)]
    pub total_response_time: f64,
    /// Every run, including failures
    #[serde(default)]
    pub total_cost: f64,
}

impl ModelMetrics {
    /// Fold in one observation
    pub fn record(&mut self, success: bool, latency_secs: f64, cost: f64) {
        self.pulls += 1;
        if success {
            self.successes += 1;
            if latency_secs.is_finite() {
                self.total_response_time += latency_secs.max(0.0);
            }
        }
        if cost.is_finite() {
            self.total_cost += cost.max(0.0);
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.successes as f64 / self.pulls as f64
        }
    }

    /// Mean latency of successful runs
    pub fn avg_response_time(&self) -> f64 {
        if self.successes == 0 {
            0.0
        } else {
            self.total_response_time / self.successes as f64
        }
    }

    pub fn avg_cost(&self) -> f64 {
        if self.pulls == 0 {
            0.0
        } else {
            self.total_cost / self.pulls as f64
        }
    }
}
