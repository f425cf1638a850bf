//! Concurrent routing and reporting
//!
//! Many tasks select and report at once; totals must add up exactly.

#[cfg(test)]
mod tests {
    use crate::common::{ProviderSetFactory, RequestFactory, SelectorFactory};
    use adaptive_router::{
        LoadBalancer, MLModelSelector, ModelPerformanceTracker, ProviderHandle, RequestOutcome,
        RoutingPipeline, Strategy,
    };
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_not_lost() {
        let lb = Arc::new(LoadBalancer::new(Strategy::WeightedRoundRobin));
        let providers = Arc::new(ProviderSetFactory::chat(&["a", "b", "c"]));
        for name in ["a", "b", "c"] {
            lb.register_provider(name);
        }

        let mut handles = Vec::new();
        for task in 0..16 {
            let lb = Arc::clone(&lb);
            let providers = Arc::clone(&providers);
            handles.push(tokio::spawn(async move {
                let request = RequestFactory::simple();
                for i in 0..50 {
                    let chosen = lb
                        .select_provider(providers.as_ref(), &request)
                        .unwrap_or_else(|| "a".to_string());
                    let success = (task + i) % 5 != 0;
                    lb.update_provider_metrics(&chosen, success, 0.5, 0.0);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let stats = lb.get_load_balancer_stats();
        assert_eq!(stats.total_requests, 16 * 50);
        let per_provider: u64 = stats.providers.values().map(|p| p.total_requests).sum();
        assert_eq!(per_provider, 16 * 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tracker_writes_persist_every_update() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ollama_model_performance.json");
        let selector = Arc::new(
            MLModelSelector::open(SelectorFactory::ollama(), &path).unwrap(),
        );

        let mut handles = Vec::new();
        for _ in 0..8 {
            let selector = Arc::clone(&selector);
            handles.push(tokio::task::spawn_blocking(move || {
                let request = RequestFactory::question();
                for _ in 0..20 {
                    let model = selector.recommend_for(&request).model;
                    selector
                        .update_for(&request, &model, &RequestOutcome::success(0.2, 0.0))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let key = "question_answer_simple";
        let in_memory: u64 = selector
            .models()
            .iter()
            .map(|m| selector.tracker().get_metrics(m, key).pulls)
            .sum();
        assert_eq!(in_memory, 160);

        let reopened = ModelPerformanceTracker::open("ollama", &path).unwrap();
        let on_disk: u64 = selector
            .models()
            .iter()
            .map(|m| reopened.get_metrics(m, key).pulls)
            .sum();
        assert_eq!(on_disk, 160);
    }

    #[tokio::test]
    async fn test_pipeline_shared_across_tasks() {
        let lb = LoadBalancer::new(Strategy::LeastConnections);
        let pipeline = Arc::new(
            RoutingPipeline::new(lb)
                .with_selector(MLModelSelector::in_memory(SelectorFactory::ollama())),
        );
        let providers = Arc::new(ProviderSetFactory::chat(&["ollama"]));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let pipeline = Arc::clone(&pipeline);
                let providers = Arc::clone(&providers);
                tokio::spawn(async move {
                    let request = RequestFactory::simple();
                    let decision = pipeline.route(providers.as_ref(), &request).unwrap();
                    let _guard = providers[&decision.provider].begin_request();
                    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
                    pipeline
                        .record_outcome(&decision, &request, &RequestOutcome::success(0.005, 0.0))
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(providers["ollama"].active_requests(), 0);
        let stats = pipeline.load_balancer().get_provider_stats("ollama").unwrap();
        assert_eq!(stats.total_requests, 10);
    }
}
