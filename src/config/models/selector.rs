//! Model selector configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-provider model selector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Provider whose models are being selected
    pub provider: String,
    /// Candidate models, in preference order for warm-up ties
    #[serde(default)]
    pub models: Vec<String>,
    /// Model returned when nothing better can be decided
    pub default_model: String,
    /// Trials each model needs per feature key before UCB1 takes over
    #[serde(default = "default_min_trials")]
    pub min_trials: u64,
    /// UCB1 exploration constant `c`
    #[serde(default = "default_exploration_constant")]
    pub exploration_constant: f64,
    /// Reward shaping
    #[serde(default)]
    pub reward: RewardConfig,
    /// Request feature extraction thresholds
    #[serde(default, alias = "feature_extraction")]
    pub features: FeatureConfig,
    /// Explicit performance file; defaults to `{storage_dir}/{provider}_model_performance.json`
    #[serde(default)]
    pub storage_file: Option<PathBuf>,
}

impl SelectorConfig {
    /// Selector with default tuning
    pub fn new(
        provider: impl Into<String>,
        models: Vec<String>,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            models,
            default_model: default_model.into(),
            min_trials: default_min_trials(),
            exploration_constant: default_exploration_constant(),
            reward: RewardConfig::default(),
            features: FeatureConfig::default(),
            storage_file: None,
        }
    }
}

/// Reward shaping for the bandit
///
/// `reward = success_weight * success_rate
///         + latency_weight * (1 - latency / latency_ceiling)
///         + cost_weight * (1 - cost / cost_ceiling)`, normalized by the weight sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Weight of the success rate (dominant)
    #[serde(default = "default_success_weight")]
    pub success_weight: f64,
    /// Weight of the latency penalty
    #[serde(default = "default_penalty_weight")]
    pub latency_weight: f64,
    /// Weight of the cost penalty
    #[serde(default = "default_penalty_weight")]
    pub cost_weight: f64,
    /// Latency (seconds) that normalizes to the full penalty
    #[serde(default = "default_latency_ceiling_secs")]
    pub latency_ceiling_secs: f64,
    /// Per-request cost that normalizes to the full penalty
    #[serde(default = "default_cost_ceiling")]
    pub cost_ceiling: f64,
}

fn default_success_weight() -> f64 {
    0.6
}

fn default_penalty_weight() -> f64 {
    0.2
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            success_weight: default_success_weight(),
            latency_weight: default_penalty_weight(),
            cost_weight: default_penalty_weight(),
            latency_ceiling_secs: default_latency_ceiling_secs(),
            cost_ceiling: default_cost_ceiling(),
        }
    }
}

/// Thresholds for request feature extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Prompts with at most this many words (and no code or image) are simple
    #[serde(default = "default_simple_word_limit")]
    pub simple_word_limit: usize,
    /// Prompts with more than this many words are complex
    #[serde(default = "default_complex_word_limit")]
    pub complex_word_limit: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            simple_word_limit: default_simple_word_limit(),
            complex_word_limit: default_complex_word_limit(),
        }
    }
}
