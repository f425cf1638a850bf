//! Configuration management for the router
//!
//! Settings come from a YAML file, from `ROUTER_*` environment variables, or from
//! both (file first, environment on top). Every field has a default, so an empty
//! document is a valid configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::core::router::strategy::Strategy;
use crate::utils::error::{Result, RouterError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the routing strategy
pub const ENV_STRATEGY: &str = "ROUTER_STRATEGY";
/// Environment variable overriding the performance storage directory
pub const ENV_STORAGE_DIR: &str = "ROUTER_STORAGE_DIR";
/// Environment variable overriding the circuit breaker failure threshold
pub const ENV_MAX_FAILURES: &str = "ROUTER_MAX_FAILURES";
/// Environment variable overriding the circuit breaker timeout (seconds)
pub const ENV_BREAKER_TIMEOUT: &str = "ROUTER_BREAKER_TIMEOUT_SECS";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "ROUTER_LOG_LEVEL";

fn default_storage_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Top-level router settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Provider load balancing
    #[serde(default)]
    pub load_balancer: LoadBalancerConfig,
    /// One model selector per provider
    #[serde(default)]
    pub selectors: Vec<SelectorConfig>,
    /// Directory holding `{provider}_model_performance.json` files
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            load_balancer: LoadBalancerConfig::default(),
            selectors: Vec::new(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl RouterSettings {
    /// Load settings from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RouterError::Config(format!("Failed to read config file: {}", e)))?;

        let mut settings = Self::from_yaml_str(&content)?;
        settings.apply_env_overrides()?;
        settings.validate()?;

        debug!("Configuration loaded successfully");
        Ok(settings)
    }

    /// Parse settings from YAML without touching the environment
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| RouterError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut settings = Self::default();
        settings.apply_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `ROUTER_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(strategy) = get(ENV_STRATEGY) {
            self.load_balancer.strategy = Strategy::parse_or_default(strategy.trim());
        }

        if let Some(dir) = get(ENV_STORAGE_DIR) {
            self.storage_dir = PathBuf::from(dir);
        }

        if let Some(max) = get(ENV_MAX_FAILURES) {
            self.load_balancer.circuit_breaker.max_failures =
                max.trim().parse().map_err(|e| {
                    RouterError::Config(format!("Invalid {}='{}': {}", ENV_MAX_FAILURES, max, e))
                })?;
        }

        if let Some(timeout) = get(ENV_BREAKER_TIMEOUT) {
            self.load_balancer.circuit_breaker.timeout_secs =
                timeout.trim().parse().map_err(|e| {
                    RouterError::Config(format!(
                        "Invalid {}='{}': {}",
                        ENV_BREAKER_TIMEOUT, timeout, e
                    ))
                })?;
        }

        if let Some(level) = get(ENV_LOG_LEVEL) {
            self.logging.level = level.trim().to_string();
        }

        Ok(())
    }

    /// Validate the whole configuration tree
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(RouterError::Validation)
    }

    /// Selector configuration for `provider`, if any
    pub fn selector(&self, provider: &str) -> Option<&SelectorConfig> {
        self.selectors.iter().find(|s| s.provider == provider)
    }

    /// Performance file path for `selector`
    pub fn performance_path(&self, selector: &SelectorConfig) -> PathBuf {
        selector.storage_file.clone().unwrap_or_else(|| {
            self.storage_dir
                .join(format!("{}_model_performance.json", selector.provider))
        })
    }
}

impl Validate for RouterSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        debug!("Validating router settings");

        self.load_balancer.validate()?;

        let mut seen = std::collections::HashSet::new();
        for selector in &self.selectors {
            selector.validate()?;
            if !seen.insert(selector.provider.as_str()) {
                return Err(format!(
                    "Duplicate selector for provider '{}'",
                    selector.provider
                ));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
logging:
  level: debug
load_balancer:
  strategy: COST_OPTIMIZED
  cost_optimization_tiers:
    economy: [ollama]
    performance: [openai, anthropic]
  circuit_breaker:
    max_failures: 5
  providers:
    - name: openai
      priority: 1
      capabilities: [chat, vision]
    - name: ollama
      priority: 2
selectors:
  - provider: ollama
    models: [llama3, mistral]
    default_model: llama3
storage_dir: /tmp/router
"#;

    #[test]
    fn test_parse_full_document() {
        let settings = RouterSettings::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.load_balancer.strategy, Strategy::CostOptimized);
        assert_eq!(settings.load_balancer.circuit_breaker.max_failures, 5);
        assert_eq!(settings.load_balancer.circuit_breaker.timeout_secs, 60.0);
        assert_eq!(settings.load_balancer.providers.len(), 2);
        assert_eq!(settings.load_balancer.providers[1].weight, 1.0);
        assert_eq!(settings.selectors[0].min_trials, 3);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let settings = RouterSettings::from_yaml_str("").unwrap();
        assert_eq!(settings, RouterSettings::default());
        assert_eq!(settings.load_balancer.strategy, Strategy::WeightedRoundRobin);
    }

    #[test]
    fn test_unknown_strategy_falls_back() {
        let settings =
            RouterSettings::from_yaml_str("load_balancer:\n  strategy: FASTEST_EVER\n").unwrap();
        assert_eq!(settings.load_balancer.strategy, Strategy::WeightedRoundRobin);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_STRATEGY, "health_based"),
            (ENV_MAX_FAILURES, "7"),
            (ENV_BREAKER_TIMEOUT, "2.5"),
            (ENV_LOG_LEVEL, " "),
        ]
        .into_iter()
        .collect();

        let mut settings = RouterSettings::default();
        settings
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.load_balancer.strategy, Strategy::HealthBased);
        assert_eq!(settings.load_balancer.circuit_breaker.max_failures, 7);
        assert_eq!(settings.load_balancer.circuit_breaker.timeout_secs, 2.5);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_invalid_numeric_override() {
        let mut settings = RouterSettings::default();
        let result = settings.apply_overrides(|k| {
            (k == ENV_MAX_FAILURES).then(|| "many".to_string())
        });
        assert!(matches!(result, Err(RouterError::Config(_))));
    }

    #[test]
    fn test_duplicate_selectors_rejected() {
        let mut settings = RouterSettings::default();
        let selector = SelectorConfig::new("ollama", vec![], "llama3");
        settings.selectors = vec![selector.clone(), selector];
        assert!(matches!(
            settings.validate(),
            Err(RouterError::Validation(_))
        ));
    }

    #[test]
    fn test_performance_path() {
        let settings = RouterSettings::from_yaml_str(SAMPLE).unwrap();
        let selector = settings.selector("ollama").unwrap();
        assert_eq!(
            settings.performance_path(selector),
            PathBuf::from("/tmp/router/ollama_model_performance.json")
        );
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let settings = RouterSettings::from_file(file.path()).await.unwrap();
        assert_eq!(settings.selectors.len(), 1);
    }

    #[tokio::test]
    async fn test_from_missing_file() {
        let result = RouterSettings::from_file("/definitely/not/here.yaml").await;
        assert!(matches!(result, Err(RouterError::Config(_))));
    }
}
