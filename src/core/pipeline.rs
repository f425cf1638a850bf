//! Provider-then-model routing in one place
//!
//! The load balancer and the selectors stay independent; this type only
//! composes them in the order a caller would.

use crate::config::RouterSettings;
use crate::core::router::load_balancer::LoadBalancer;
use crate::core::router::provider::ProviderHandle;
use crate::core::selector::MLModelSelector;
use crate::core::types::{AIRequest, RequestOutcome};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Where a request should go
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub provider: String,
    /// `None` when the provider has no selector configured
    pub model: Option<String>,
    /// Feature key the model was chosen for
    pub feature_key: Option<String>,
}

/// Load balancer plus one model selector per provider
#[derive(Debug)]
pub struct RoutingPipeline {
    load_balancer: LoadBalancer,
    selectors: HashMap<String, MLModelSelector>,
}

impl RoutingPipeline {
    pub fn new(load_balancer: LoadBalancer) -> Self {
        Self {
            load_balancer,
            selectors: HashMap::new(),
        }
    }

    /// Build the load balancer and every configured selector
    ///
    /// Selectors load their performance files from the configured storage
    /// directory.
    pub fn from_settings(settings: &RouterSettings) -> Result<Self> {
        Self::from_settings_with(settings, LoadBalancer::from_config(&settings.load_balancer))
    }

    /// Like [`RoutingPipeline::from_settings`] around a caller-built load
    /// balancer, e.g. one from [`LoadBalancer::with_seed`]
    pub fn from_settings_with(
        settings: &RouterSettings,
        load_balancer: LoadBalancer,
    ) -> Result<Self> {
        let mut pipeline = Self::new(load_balancer);
        for config in &settings.selectors {
            let path = settings.performance_path(config);
            let selector = MLModelSelector::open(config.clone(), &path)?;
            pipeline.add_selector(selector);
        }
        info!(
            "Routing pipeline ready: {} providers, {} selectors",
            pipeline.load_balancer.registered_providers().len(),
            pipeline.selectors.len()
        );
        Ok(pipeline)
    }

    /// Attach a selector, replacing any previous one for the same provider
    pub fn add_selector(&mut self, selector: MLModelSelector) {
        self.load_balancer.register_provider(selector.provider());
        self.selectors
            .insert(selector.provider().to_string(), selector);
    }

    /// Attach a selector (builder pattern)
    pub fn with_selector(mut self, selector: MLModelSelector) -> Self {
        self.add_selector(selector);
        self
    }

    pub fn load_balancer(&self) -> &LoadBalancer {
        &self.load_balancer
    }

    pub fn selector(&self, provider: &str) -> Option<&MLModelSelector> {
        self.selectors.get(provider)
    }

    /// Selectors keyed by provider
    pub fn selectors(&self) -> &HashMap<String, MLModelSelector> {
        &self.selectors
    }

    /// Pick a provider, then a model on it
    pub fn route<H: ProviderHandle>(
        &self,
        providers: &HashMap<String, H>,
        request: &AIRequest,
    ) -> Option<RoutingDecision> {
        let provider = self.load_balancer.select_provider(providers, request)?;

        let decision = match self.selectors.get(&provider) {
            Some(selector) => {
                let rec = selector.recommend_for(request);
                RoutingDecision {
                    provider,
                    model: Some(rec.model),
                    feature_key: Some(rec.feature_key),
                }
            }
            None => RoutingDecision {
                provider,
                model: None,
                feature_key: None,
            },
        };

        debug!(request_id = %request.id, ?decision, "Routed request");
        Some(decision)
    }

    /// Feed an outcome back to both the load balancer and the model selector
    ///
    /// Provider metrics are always updated. A persistence failure in the
    /// selector is logged and returned; the in-memory statistics still apply.
    pub fn record_outcome(
        &self,
        decision: &RoutingDecision,
        request: &AIRequest,
        outcome: &RequestOutcome,
    ) -> Result<()> {
        self.load_balancer.update_provider_metrics(
            &decision.provider,
            outcome.success,
            outcome.latency_secs,
            outcome.cost,
        );

        let (Some(model), Some(selector)) =
            (decision.model.as_deref(), self.selectors.get(&decision.provider))
        else {
            return Ok(());
        };

        selector.update_for(request, model, outcome).inspect_err(|e| {
            warn!(
                provider = %decision.provider,
                model,
                "Failed to persist model performance: {}", e
            );
        })
    }
}
