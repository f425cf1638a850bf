//! Test fixtures and data factories
//!
//! All factories create real objects, not mocks.

use adaptive_router::config::SelectorConfig;
use adaptive_router::{AIRequest, ProviderCapability, ProviderProfile};
use std::collections::HashMap;

/// Factory for requests of each feature bucket
pub struct RequestFactory;

impl RequestFactory {
    /// Short, plain request (`generic_simple`)
    pub fn simple() -> AIRequest {
        AIRequest::new("Turn off the porch light")
    }

    /// Short question (`question_answer_simple`)
    pub fn question() -> AIRequest {
        AIRequest::new("What is the capital of France?")
    }

    /// Code request (`code_medium`)
    pub fn code() -> AIRequest {
        AIRequest::new("def toggle(device):\n    return not device.on")
    }

    /// Image request
    pub fn with_image() -> AIRequest {
        AIRequest::new("Who is at the front door?").with_image("/tmp/camera/door.jpg")
    }

    /// Request tagged with a quality tier
    pub fn tiered(tier: &str) -> AIRequest {
        Self::simple().with_context("qualityTier", tier)
    }
}

/// Factory for provider maps handed to `select_provider`
pub struct ProviderSetFactory;

impl ProviderSetFactory {
    /// Chat-only providers with default priority and weight
    pub fn chat(names: &[&str]) -> HashMap<String, ProviderProfile> {
        names
            .iter()
            .map(|n| (n.to_string(), ProviderProfile::new(*n)))
            .collect()
    }

    /// Typical cloud + local mix: two vision-capable clouds and one local model server
    pub fn mixed() -> HashMap<String, ProviderProfile> {
        let vision = vec![ProviderCapability::Chat, ProviderCapability::Vision];
        let mut providers = HashMap::new();
        providers.insert(
            "openai".to_string(),
            ProviderProfile::new("openai")
                .with_priority(1)
                .with_capabilities(vision.clone()),
        );
        providers.insert(
            "anthropic".to_string(),
            ProviderProfile::new("anthropic")
                .with_priority(1)
                .with_capabilities(vision),
        );
        providers.insert(
            "ollama".to_string(),
            ProviderProfile::new("ollama").with_priority(2),
        );
        providers
    }
}

/// Factory for selector configurations
pub struct SelectorFactory;

impl SelectorFactory {
    /// Selector for the local model server
    pub fn ollama() -> SelectorConfig {
        SelectorConfig::new(
            "ollama",
            vec!["llama3".to_string(), "mistral".to_string(), "phi3".to_string()],
            "llama3",
        )
    }

    /// Two-model selector
    pub fn pair(provider: &str, good: &str, bad: &str) -> SelectorConfig {
        SelectorConfig::new(provider, vec![good.to_string(), bad.to_string()], good)
    }
}
