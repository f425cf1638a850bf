//! Online model selection for one provider

use super::features::{FeatureExtractor, RequestFeatures};
use super::metrics::ModelMetrics;
use super::tracker::{MetricsTable, ModelPerformanceTracker};
use super::ucb::Ucb1;
use crate::config::SelectorConfig;
use crate::core::types::{AIRequest, RequestOutcome};
use crate::utils::error::Result;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// How a recommendation was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPhase {
    /// Some model still lacks the minimum trials for this key
    WarmUp,
    /// UCB1 argmax
    Exploit,
    /// Default model (no candidates, or the request could not be analysed)
    Fallback,
}

/// A model choice and the feature key it was made for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub model: String,
    pub feature_key: String,
    pub phase: SelectionPhase,
}

/// Observability snapshot for one selector
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub provider: String,
    pub models: Vec<String>,
    pub default_model: String,
    pub min_trials: u64,
    /// Feature key -> still warming up
    pub warm_up: BTreeMap<String, bool>,
    pub metrics: MetricsTable,
}

/// Chooses a model on an already-selected provider
///
/// Every candidate gets `min_trials` observations per feature key before
/// UCB1 ranks them; until then the least-tried model is picked, rotating
/// through ties.
pub struct MLModelSelector {
    config: SelectorConfig,
    extractor: FeatureExtractor,
    tracker: ModelPerformanceTracker,
    ucb: Ucb1,
    /// Feature key -> rotation offset for warm-up ties
    warm_up_cursors: Mutex<HashMap<String, usize>>,
}

impl MLModelSelector {
    /// Selector over an existing tracker
    pub fn new(config: SelectorConfig, tracker: ModelPerformanceTracker) -> Self {
        Self {
            extractor: FeatureExtractor::new(config.features.clone()),
            ucb: Ucb1::new(config.exploration_constant, config.reward.clone()),
            config,
            tracker,
            warm_up_cursors: Mutex::new(HashMap::new()),
        }
    }

    /// Selector whose statistics live only in memory
    pub fn in_memory(config: SelectorConfig) -> Self {
        let tracker = ModelPerformanceTracker::in_memory(config.provider.clone());
        Self::new(config, tracker)
    }

    /// Selector persisting to `path`
    pub fn open(config: SelectorConfig, path: impl AsRef<Path>) -> Result<Self> {
        let tracker = ModelPerformanceTracker::open(config.provider.clone(), path)?;
        Ok(Self::new(config, tracker))
    }

    pub fn provider(&self) -> &str {
        &self.config.provider
    }

    pub fn models(&self) -> &[String] {
        &self.config.models
    }

    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    pub fn tracker(&self) -> &ModelPerformanceTracker {
        &self.tracker
    }

    /// Pick a model for `prompt`
    pub fn recommend_model(&self, prompt: &str, image_path: Option<&str>) -> String {
        self.recommend(prompt, image_path).model
    }

    /// Pick a model for `request`
    pub fn recommend_for(&self, request: &AIRequest) -> Recommendation {
        self.recommend(&request.prompt, request.image())
    }

    /// Pick a model and report how it was chosen
    pub fn recommend(&self, prompt: &str, image_path: Option<&str>) -> Recommendation {
        let features = match self.extractor.try_extract(prompt, image_path) {
            Ok(features) => features,
            Err(e) => {
                warn!(
                    provider = %self.config.provider,
                    "Feature extraction failed, using default model: {}", e
                );
                return self.fallback(RequestFeatures::fallback(image_path.is_some()).feature_key());
            }
        };
        let key = features.feature_key();

        let models = &self.config.models;
        if models.is_empty() {
            return self.fallback(key);
        }

        let metrics = self.tracker.metrics_for_key(models, &key);

        let recommendation = match self.warm_up_pick(&key, &metrics) {
            Some(index) => Recommendation {
                model: models[index].clone(),
                feature_key: key,
                phase: SelectionPhase::WarmUp,
            },
            None => Recommendation {
                model: models[self.exploit_pick(&metrics)].clone(),
                feature_key: key,
                phase: SelectionPhase::Exploit,
            },
        };

        debug!(
            provider = %self.config.provider,
            model = %recommendation.model,
            feature_key = %recommendation.feature_key,
            phase = ?recommendation.phase,
            "Recommended model"
        );
        recommendation
    }

    fn fallback(&self, feature_key: String) -> Recommendation {
        Recommendation {
            model: self.config.default_model.clone(),
            feature_key,
            phase: SelectionPhase::Fallback,
        }
    }

    /// Index of the next under-sampled model, if warm-up is still running
    fn warm_up_pick(&self, key: &str, metrics: &[ModelMetrics]) -> Option<usize> {
        let min_trials = self.config.min_trials;
        let fewest = metrics
            .iter()
            .map(|m| m.pulls)
            .filter(|&pulls| pulls < min_trials)
            .min()?;

        let tied: Vec<usize> = metrics
            .iter()
            .enumerate()
            .filter(|(_, m)| m.pulls == fewest)
            .map(|(i, _)| i)
            .collect();

        let mut cursors = self.warm_up_cursors.lock();
        let cursor = cursors.entry(key.to_string()).or_insert(0);
        let index = tied[*cursor % tied.len()];
        *cursor = cursor.wrapping_add(1);
        Some(index)
    }

    /// Index of the highest UCB1 score; the first model wins ties
    fn exploit_pick(&self, metrics: &[ModelMetrics]) -> usize {
        let total: u64 = metrics.iter().map(|m| m.pulls).sum();
        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (i, m) in metrics.iter().enumerate() {
            let score = self.ucb.score(m, total);
            if score > best_score {
                best = i;
                best_score = score;
            }
        }
        best
    }

    /// Record how `model` did on `prompt`
    ///
    /// Prompts that cannot be analysed are not recorded: `recommend` never
    /// consulted the bandit for them.
    pub fn update_performance(
        &self,
        model: &str,
        prompt: &str,
        success: bool,
        latency_secs: f64,
        cost: f64,
        image_path: Option<&str>,
    ) -> Result<()> {
        let key = match self.extractor.try_extract(prompt, image_path) {
            Ok(features) => features.feature_key(),
            Err(e) => {
                warn!(
                    provider = %self.config.provider,
                    model,
                    "Not recording outcome, feature extraction failed: {}", e
                );
                return Ok(());
            }
        };
        if !self.config.models.iter().any(|m| m == model) {
            debug!(
                provider = %self.config.provider,
                "Recording outcome for unlisted model {}", model
            );
        }
        self.tracker
            .update_metrics(model, &key, success, latency_secs, cost)
    }

    /// Record how `model` did on `request`
    pub fn update_for(
        &self,
        request: &AIRequest,
        model: &str,
        outcome: &RequestOutcome,
    ) -> Result<()> {
        self.update_performance(
            model,
            &request.prompt,
            outcome.success,
            outcome.latency_secs,
            outcome.cost,
            request.image(),
        )
    }

    /// Provider, candidates, warm-up status and the full metrics table
    pub fn get_model_stats(&self) -> ModelStats {
        let metrics = self.tracker.snapshot();

        let mut warm_up = BTreeMap::new();
        for key in metrics.values().flat_map(|keys| keys.keys()) {
            if warm_up.contains_key(key) {
                continue;
            }
            let warming = self.config.models.iter().any(|model| {
                metrics
                    .get(model)
                    .and_then(|keys| keys.get(key))
                    .map_or(0, |m| m.pulls)
                    < self.config.min_trials
            });
            warm_up.insert(key.clone(), warming);
        }

        ModelStats {
            provider: self.config.provider.clone(),
            models: self.config.models.clone(),
            default_model: self.config.default_model.clone(),
            min_trials: self.config.min_trials,
            warm_up,
            metrics,
        }
    }
}

impl std::fmt::Debug for MLModelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MLModelSelector")
            .field("provider", &self.config.provider)
            .field("models", &self.config.models)
            .field("default_model", &self.config.default_model)
            .finish()
    }
}
