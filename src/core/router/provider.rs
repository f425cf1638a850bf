//! Narrow view of a provider used for filtering and ranking
//!
//! The router never performs inference through these handles; it only reads
//! capabilities, static routing configuration and the in-flight count.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Capabilities a provider may advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderCapability {
    /// Text chat completion
    Chat,
    /// Image input
    Vision,
    /// Streaming responses
    Streaming,
    /// Tool / function calling
    ToolCalling,
}

/// Everything the load balancer needs to know about a provider
#[cfg_attr(test, mockall::automock)]
pub trait ProviderHandle {
    /// Whether the provider advertises `capability`
    fn supports(&self, capability: ProviderCapability) -> bool;

    /// Routing priority (lower value = higher priority)
    fn priority(&self) -> u32;

    /// Relative weight for weighted selection
    fn weight(&self) -> f64;

    /// Requests currently in flight on this provider
    fn active_requests(&self) -> usize;

    /// Whether the provider accepts image input
    fn supports_vision(&self) -> bool {
        self.supports(ProviderCapability::Vision)
    }
}

impl<T: ProviderHandle + ?Sized> ProviderHandle for Arc<T> {
    fn supports(&self, capability: ProviderCapability) -> bool {
        (**self).supports(capability)
    }

    fn priority(&self) -> u32 {
        (**self).priority()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn active_requests(&self) -> usize {
        (**self).active_requests()
    }
}

impl<T: ProviderHandle + ?Sized> ProviderHandle for &T {
    fn supports(&self, capability: ProviderCapability) -> bool {
        (**self).supports(capability)
    }

    fn priority(&self) -> u32 {
        (**self).priority()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn active_requests(&self) -> usize {
        (**self).active_requests()
    }
}

/// Configuration-driven [`ProviderHandle`] with its own in-flight counter
///
/// ## Example
///
/// ```rust
/// use adaptive_router::{ProviderCapability, ProviderHandle, ProviderProfile};
///
/// let profile = ProviderProfile::new("ollama")
///     .with_priority(2)
///     .with_capabilities(vec![ProviderCapability::Chat, ProviderCapability::Vision]);
///
/// let guard = profile.begin_request();
/// assert_eq!(profile.active_requests(), 1);
/// drop(guard);
/// assert_eq!(profile.active_requests(), 0);
/// ```
#[derive(Debug)]
pub struct ProviderProfile {
    /// Provider name
    pub name: String,
    /// Priority (lower value = higher priority)
    pub priority: u32,
    /// Weight for weighted random selection
    pub weight: f64,
    /// Advertised capabilities
    pub capabilities: Vec<ProviderCapability>,
    active: Arc<AtomicUsize>,
}

impl ProviderProfile {
    /// Chat-only provider with priority 0 and weight 1
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            weight: 1.0,
            capabilities: vec![ProviderCapability::Chat],
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set priority (builder pattern)
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Set weight (builder pattern)
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Replace capabilities (builder pattern)
    pub fn with_capabilities(mut self, capabilities: Vec<ProviderCapability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Mark a request as in flight until the returned guard is dropped
    pub fn begin_request(&self) -> ActiveRequestGuard {
        self.active.fetch_add(1, Ordering::Relaxed);
        ActiveRequestGuard {
            active: Arc::clone(&self.active),
        }
    }
}

impl ProviderHandle for ProviderProfile {
    fn supports(&self, capability: ProviderCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn active_requests(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }
}

/// Decrements the owning profile's in-flight count on drop
#[derive(Debug)]
pub struct ActiveRequestGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActiveRequestGuard {
    fn drop(&mut self) {
        // Saturating: a counter reset elsewhere must not wrap
        let _ = self
            .active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
                Some(n.saturating_sub(1))
            });
    }
}
