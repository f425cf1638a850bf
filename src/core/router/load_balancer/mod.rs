//! Load balancer for provider selection
//!
//! Tracks health and circuit state per provider and picks one provider per
//! request according to the active [`Strategy`](super::strategy::Strategy).
//!
//! ## Example
//!
//! ```rust
//! use adaptive_router::{AIRequest, LoadBalancer, ProviderProfile};
//! use std::collections::HashMap;
//!
//! let lb = LoadBalancer::single_user();
//! lb.register_provider("openai");
//! lb.register_provider("ollama");
//!
//! let mut providers = HashMap::new();
//! providers.insert("openai".to_string(), ProviderProfile::new("openai"));
//! providers.insert("ollama".to_string(), ProviderProfile::new("ollama"));
//!
//! let request = AIRequest::new("Turn on the kitchen lights");
//! let chosen = lb.select_provider(&providers, &request).unwrap();
//! lb.update_provider_metrics(&chosen, true, 0.8, 0.0004);
//! ```

mod core;
mod presets;
mod selection;
mod stats;

pub use core::LoadBalancer;
pub use stats::{LoadBalancerStats, ProviderStats};
