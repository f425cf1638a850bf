//! # adaptive-router
//!
//! Adaptive routing of AI completion requests across interchangeable
//! providers and models.
//!
//! ## Features
//!
//! - **Health-aware load balancing**: EWMA latency, reliability and a blended health score per provider
//! - **Circuit breaking**: failing providers are isolated and probed again after a cool-down
//! - **Six strategies**: priority, least connections, response time, cost tiers, health, weighted
//! - **Online model selection**: UCB1 per request shape with a warm-up phase
//! - **Durable learning**: per-provider model statistics survive restarts
//!
//! The crate never talks to a provider itself. Callers dispatch the request
//! and report the outcome back.
//!
//! ## Quick Start
//!
//! ```rust
//! use adaptive_router::{
//!     AIRequest, LoadBalancer, MLModelSelector, ProviderCapability, ProviderProfile,
//!     RequestOutcome, RoutingPipeline, Strategy,
//! };
//! use adaptive_router::config::SelectorConfig;
//! use std::collections::HashMap;
//!
//! let lb = LoadBalancer::new(Strategy::HealthBased);
//! lb.register_provider("openai");
//!
//! let pipeline = RoutingPipeline::new(lb).with_selector(MLModelSelector::in_memory(
//!     SelectorConfig::new("ollama", vec!["llama3".into(), "mistral".into()], "llama3"),
//! ));
//!
//! let mut providers = HashMap::new();
//! providers.insert(
//!     "openai".to_string(),
//!     ProviderProfile::new("openai")
//!         .with_capabilities(vec![ProviderCapability::Chat, ProviderCapability::Vision]),
//! );
//! providers.insert("ollama".to_string(), ProviderProfile::new("ollama"));
//!
//! let request = AIRequest::new("What time is sunset today?");
//! if let Some(decision) = pipeline.route(&providers, &request) {
//!     // ... dispatch to decision.provider / decision.model ...
//!     pipeline
//!         .record_outcome(&decision, &request, &RequestOutcome::success(0.9, 0.0002))
//!         .unwrap();
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::RouterSettings;
pub use core::pipeline::{RoutingDecision, RoutingPipeline};
pub use core::router::{
    ActiveRequestGuard, CircuitBreaker, CircuitState, LoadBalancer, LoadBalancerStats,
    ProviderCapability, ProviderHandle, ProviderMetrics, ProviderProfile, ProviderStats,
    Strategy,
};
pub use core::selector::{
    FeatureExtractor, MLModelSelector, ModelMetrics, ModelPerformanceTracker, ModelStats,
    RequestFeatures, Ucb1,
};
pub use core::types::{AIRequest, RequestOutcome};
pub use utils::error::{Result, RouterError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name information
pub const NAME: &str = env!("CARGO_PKG_NAME");
