//! Configuration loading and validation
//!
//! YAML files on disk through to a working pipeline.

#[cfg(test)]
mod tests {
    use crate::common::{ProviderSetFactory, RequestFactory};
    use crate::{assert_err, assert_ok};
    use adaptive_router::config::LoadBalancerConfig;
    use adaptive_router::{
        LoadBalancer, RouterError, RouterSettings, RoutingPipeline, Strategy,
    };
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const HOUSEHOLD: &str = r#"
logging:
  level: debug
load_balancer:
  strategy: COST_OPTIMIZED
  costOptimizationTiers:
    economy: [ollama]
    performance: [openai, anthropic]
  circuit_breaker:
    max_failures: 2
    timeout_secs: 30
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
    min_trials: 2
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_household_config() {
        let file = write_config(HOUSEHOLD);
        let settings = assert_ok!(RouterSettings::from_file(file.path()).await);

        assert_eq!(settings.logging.level, "debug");
        let lb = &settings.load_balancer;
        assert_eq!(lb.strategy, Strategy::CostOptimized);
        assert_eq!(lb.circuit_breaker.max_failures, 2);
        assert_eq!(lb.cost_optimization_tiers["economy"], vec!["ollama"]);
        assert_eq!(lb.providers.len(), 2);

        let selector = settings.selector("ollama").unwrap();
        assert_eq!(selector.min_trials, 2);
        assert_eq!(selector.exploration_constant, 2.0);
        assert!(settings.selector("openai").is_none());
    }

    #[tokio::test]
    async fn test_config_drives_pipeline() {
        let file = write_config(HOUSEHOLD);
        let dir = TempDir::new().unwrap();
        let mut settings = assert_ok!(RouterSettings::from_file(file.path()).await);
        settings.storage_dir = dir.path().to_path_buf();

        let pipeline = assert_ok!(RoutingPipeline::from_settings(&settings));
        let lb = pipeline.load_balancer();
        assert!(lb.is_registered("openai"));
        assert!(lb.is_registered("ollama"));

        let providers = ProviderSetFactory::mixed();
        let decision = pipeline
            .route(&providers, &RequestFactory::tiered("economy"))
            .unwrap();
        assert_eq!(decision.provider, "ollama");
        assert!(decision.model.is_some());
    }

    #[tokio::test]
    async fn test_unknown_strategy_falls_back() {
        let file = write_config("load_balancer:\n  strategy: FASTEST_POSSIBLE\n");
        let settings = assert_ok!(RouterSettings::from_file(file.path()).await);
        assert_eq!(
            settings.load_balancer.strategy,
            Strategy::WeightedRoundRobin
        );
    }

    #[tokio::test]
    async fn test_invalid_breaker_rejected() {
        let file = write_config("load_balancer:\n  circuit_breaker:\n    max_failures: 0\n");
        let err = assert_err!(RouterSettings::from_file(file.path()).await);
        assert!(matches!(err, RouterError::Validation(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_duplicate_provider_rejected() {
        let yaml = "load_balancer:\n  providers:\n    - name: ollama\n    - name: ollama\n";
        let file = write_config(yaml);
        let err = assert_err!(RouterSettings::from_file(file.path()).await);
        assert!(err.to_string().contains("Duplicate provider"), "{}", err);
    }

    #[tokio::test]
    async fn test_malformed_yaml_is_config_error() {
        let file = write_config("load_balancer: [unterminated\n");
        let err = assert_err!(RouterSettings::from_file(file.path()).await);
        assert!(matches!(err, RouterError::Config(_)), "{:?}", err);
    }

    #[test]
    fn test_presets_validate() {
        use adaptive_router::config::Validate;

        let mut tiers = HashMap::new();
        tiers.insert("economy".to_string(), vec!["ollama".to_string()]);

        for preset in [
            LoadBalancerConfig::single_user(),
            LoadBalancerConfig::development(),
            LoadBalancerConfig::cost_optimized(tiers),
            LoadBalancerConfig::cost_optimized(HashMap::new()),
        ] {
            assert_ok!(preset.validate());
        }
    }

    #[test]
    fn test_preset_load_balancers() {
        assert_eq!(LoadBalancer::single_user().strategy(), Strategy::HealthBased);
        assert_eq!(
            LoadBalancer::development().strategy(),
            Strategy::WeightedRoundRobin
        );

        let lb = LoadBalancer::cost_optimized(HashMap::new());
        assert_eq!(lb.strategy(), Strategy::CostOptimized);
        let tiers = lb.cost_tiers();
        assert_eq!(tiers.len(), 3);
        assert!(tiers.values().all(|members| members.is_empty()));
    }
}
