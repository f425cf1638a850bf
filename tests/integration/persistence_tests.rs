//! Performance persistence integration tests

#[cfg(test)]
mod tests {
    use crate::common::{ProviderSetFactory, RequestFactory, SelectorFactory};
    use crate::{assert_approx_eq, assert_err, assert_ok};
    use adaptive_router::core::selector::PERFORMANCE_SCHEMA_VERSION;
    use adaptive_router::{
        ModelPerformanceTracker, RequestOutcome, RouterError, RouterSettings, RoutingPipeline,
    };
    use tempfile::TempDir;

    #[test]
    fn test_tracker_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ollama_model_performance.json");

        {
            let tracker = assert_ok!(ModelPerformanceTracker::open("ollama", &path));
            assert_ok!(tracker.update_metrics("llama3", "generic_simple", true, 0.75, 0.0));
            assert_ok!(tracker.update_metrics("llama3", "generic_simple", true, 1.25, 0.0));
            assert_ok!(tracker.update_metrics("phi3", "code_medium", false, 3.0, 0.001));
        }

        let tracker = assert_ok!(ModelPerformanceTracker::open("ollama", &path));
        let llama = tracker.get_metrics("llama3", "generic_simple");
        assert_eq!(llama.pulls, 2);
        assert_eq!(llama.successes, 2);
        assert_approx_eq!(llama.total_response_time, 2.0);
        assert_approx_eq!(llama.total_cost, 0.0);

        let phi = tracker.get_metrics("phi3", "code_medium");
        assert_eq!(phi.pulls, 1);
        assert_eq!(phi.successes, 0);
        assert_approx_eq!(phi.total_response_time, 0.0);
        assert_approx_eq!(phi.total_cost, 0.001);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        let tracker = assert_ok!(ModelPerformanceTracker::open("openai", &path));
        assert_ok!(tracker.update_metrics("gpt-4o", "generic_simple", true, 1.0, 0.01));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["p.json".to_string()]);
    }

    #[test]
    fn test_newer_schema_left_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.json");
        let newer = format!(
            r#"{{"version": {}, "provider": "openai", "updated_at": "2026-03-01T12:00:00Z", "models": {{}}, "extra": true}}"#,
            PERFORMANCE_SCHEMA_VERSION + 1
        );
        std::fs::write(&path, &newer).unwrap();

        let err = assert_err!(ModelPerformanceTracker::open("openai", &path));
        assert!(matches!(err, RouterError::UnsupportedSchemaVersion { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), newer);
    }

    #[test]
    fn test_pipeline_learning_survives_restart() {
        let dir = TempDir::new().unwrap();
        let mut settings = RouterSettings::default();
        settings.storage_dir = dir.path().to_path_buf();
        settings.selectors.push(SelectorFactory::pair("ollama", "llama3", "mistral"));

        let providers = ProviderSetFactory::chat(&["ollama"]);
        let request = RequestFactory::simple();
        {
            let pipeline = assert_ok!(RoutingPipeline::from_settings(&settings));
            for _ in 0..6 {
                let decision = pipeline.route(&providers, &request).unwrap();
                let outcome = if decision.model.as_deref() == Some("llama3") {
                    RequestOutcome::success(0.5, 0.0)
                } else {
                    RequestOutcome::failure(10.0)
                };
                assert_ok!(pipeline.record_outcome(&decision, &request, &outcome));
            }
        }

        assert!(dir.path().join("ollama_model_performance.json").exists());

        let pipeline = assert_ok!(RoutingPipeline::from_settings(&settings));
        let selector = pipeline.selector("ollama").unwrap();
        let stats = selector.get_model_stats();
        assert_eq!(stats.warm_up.get("generic_simple"), Some(&false));
        assert_eq!(stats.metrics["llama3"]["generic_simple"].pulls, 3);

        let decision = pipeline.route(&providers, &request).unwrap();
        assert_eq!(decision.model.as_deref(), Some("llama3"));
    }
}
