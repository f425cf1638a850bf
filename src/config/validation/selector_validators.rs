//! Model selector configuration validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for SelectorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.provider.trim().is_empty() {
            return Err("Selector provider cannot be empty".to_string());
        }

        if self.default_model.trim().is_empty() {
            return Err(format!(
                "Selector for '{}' needs a default model",
                self.provider
            ));
        }

        if self.models.iter().any(|m| m.trim().is_empty()) {
            return Err(format!(
                "Selector for '{}' lists an empty model name",
                self.provider
            ));
        }

        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err("Exploration constant must be a non-negative number".to_string());
        }

        self.reward.validate()?;
        self.features.validate()?;

        Ok(())
    }
}

impl Validate for RewardConfig {
    fn validate(&self) -> Result<(), String> {
        let weights = [self.success_weight, self.latency_weight, self.cost_weight];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err("Reward weights must be non-negative numbers".to_string());
        }

        if weights.iter().sum::<f64>() <= 0.0 {
            return Err("Reward weights must not all be zero".to_string());
        }

        if !(self.latency_ceiling_secs > 0.0) {
            return Err("Reward latency ceiling must be greater than 0".to_string());
        }

        if !(self.cost_ceiling > 0.0) {
            return Err("Reward cost ceiling must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for FeatureConfig {
    fn validate(&self) -> Result<(), String> {
        if self.simple_word_limit >= self.complex_word_limit {
            return Err(format!(
                "Simple word limit ({}) must be below complex word limit ({})",
                self.simple_word_limit, self.complex_word_limit
            ));
        }

        Ok(())
    }
}
