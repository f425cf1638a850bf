//! Load balancer integration tests
//!
//! Provider selection under the documented filtering and ranking rules.

#[cfg(test)]
mod tests {
    use crate::common::assertions::ProviderStatsAssertions;
    use crate::common::{
        ProviderSetFactory, RequestFactory, drive_failing, drive_healthy, selection_counts,
    };
    use adaptive_router::config::LoadBalancerConfig;
    use adaptive_router::{CircuitState, LoadBalancer, Strategy};
    use std::collections::HashMap;

    /// A healthy provider wins more often than an unhealthy one
    #[test]
    fn test_healthy_provider_selected_more_often() {
        for strategy in [Strategy::HealthBased, Strategy::WeightedRoundRobin] {
            let lb = LoadBalancer::with_seed(
                &LoadBalancerConfig {
                    strategy,
                    ..Default::default()
                },
                2024,
            );
            lb.register_provider("steady");
            lb.register_provider("shaky");
            drive_healthy(&lb, "steady");
            drive_failing(&lb, "shaky");

            let providers = ProviderSetFactory::chat(&["steady", "shaky"]);
            let counts = selection_counts(&lb, &providers, &RequestFactory::simple(), 20);
            let steady = counts.get("steady").copied().unwrap_or(0);
            let shaky = counts.get("shaky").copied().unwrap_or(0);
            assert!(steady > shaky, "{}: {} vs {}", strategy, steady, shaky);
        }
    }

    /// Open circuits and missing vision support are never relaxed
    #[test]
    fn test_hard_filters_hold_for_every_strategy() {
        for strategy in Strategy::ALL {
            let lb = LoadBalancer::with_seed(
                &LoadBalancerConfig::cost_optimized(HashMap::new()),
                5,
            );
            lb.set_strategy(strategy);
            for name in ["openai", "anthropic", "ollama"] {
                lb.register_provider(name);
            }
            drive_healthy(&lb, "ollama");
            for _ in 0..3 {
                lb.update_provider_metrics("openai", false, 2.0, 0.0);
            }

            let providers = ProviderSetFactory::mixed();
            for _ in 0..15 {
                let chosen = lb
                    .select_provider(&providers, &RequestFactory::with_image())
                    .unwrap();
                assert_eq!(chosen, "anthropic", "strategy {}", strategy);
            }
        }
    }

    /// Stats stay consistent over a mixed run
    #[test]
    fn test_stats_invariants_after_mixed_traffic() {
        let lb = LoadBalancer::development();
        for i in 0..60 {
            let name = if i % 2 == 0 { "a" } else { "b" };
            lb.update_provider_metrics(name, i % 7 != 0, (i % 13) as f64, 0.001);
        }

        let stats = lb.get_load_balancer_stats();
        assert_eq!(stats.total_requests, 60);
        for provider in stats.providers.values() {
            provider.assert_scores_bounded();
            provider.assert_reliability_consistent();
        }
    }

    /// Cost tiers narrow the candidate set, unknown tiers do not
    #[test]
    fn test_cost_tiers() {
        let mut tiers = HashMap::new();
        tiers.insert("economy".to_string(), vec!["ollama".to_string()]);
        tiers.insert(
            "performance".to_string(),
            vec!["openai".to_string(), "anthropic".to_string()],
        );
        let lb = LoadBalancer::cost_optimized(tiers);
        for name in ["openai", "anthropic", "ollama"] {
            lb.register_provider(name);
        }
        drive_healthy(&lb, "ollama");
        drive_healthy(&lb, "anthropic");
        lb.update_provider_metrics("openai", true, 4.0, 0.02);

        let providers = ProviderSetFactory::mixed();
        assert_eq!(
            lb.select_provider(&providers, &RequestFactory::tiered("economy"))
                .as_deref(),
            Some("ollama")
        );
        let performance = lb
            .select_provider(&providers, &RequestFactory::tiered("performance"))
            .unwrap();
        assert!(performance == "openai" || performance == "anthropic");
        assert!(
            lb.select_provider(&providers, &RequestFactory::tiered("platinum"))
                .is_some()
        );
    }

    /// A tripped provider shows up in the aggregate stats
    #[test]
    fn test_open_circuit_reported() {
        let lb = LoadBalancer::single_user();
        for _ in 0..3 {
            lb.update_provider_metrics("openai", false, 1.0, 0.0);
        }
        lb.update_provider_metrics("ollama", true, 1.0, 0.0);

        let stats = lb.get_load_balancer_stats();
        assert_eq!(stats.open_circuits, 1);
        assert_eq!(stats.available_providers, 1);
        assert_eq!(stats.providers["openai"].circuit_state, CircuitState::Open);
    }
}
