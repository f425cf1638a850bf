//! Online model selection
//!
//! Per provider, requests are bucketed by [`features::FeatureExtractor`] and
//! each bucket runs its own UCB1 bandit over the provider's models. Outcomes
//! are remembered on disk so learning survives restarts.
//!
//! ## Example
//!
//! ```rust
//! use adaptive_router::MLModelSelector;
//! use adaptive_router::config::SelectorConfig;
//!
//! let config = SelectorConfig::new(
//!     "ollama",
//!     vec!["llama3".to_string(), "mistral".to_string()],
//!     "llama3",
//! );
//! let selector = MLModelSelector::in_memory(config);
//!
//! let prompt = "What is the weather like tomorrow?";
//! let model = selector.recommend_model(prompt, None);
//! selector
//!     .update_performance(&model, prompt, true, 1.2, 0.0, None)
//!     .unwrap();
//! ```

pub mod features;
pub mod metrics;
pub mod selector;
pub mod tracker;
pub mod ucb;

pub use features::{Complexity, FeatureExtractor, RequestFeatures, TaskCategory};
pub use metrics::ModelMetrics;
pub use selector::{MLModelSelector, ModelStats, Recommendation, SelectionPhase};
pub use tracker::{MetricsTable, ModelPerformanceTracker, PERFORMANCE_SCHEMA_VERSION};
pub use ucb::Ucb1;
