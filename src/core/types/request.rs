//! Request descriptors handed to the router by callers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Context key carrying the caller's price/quality preference
pub const QUALITY_TIER_KEY: &str = "qualityTier";

/// Tier used when a request does not name one
pub const DEFAULT_QUALITY_TIER: &str = "balanced";

/// A single completion request as seen by the router
///
/// The router only inspects the prompt, the optional image and the context map;
/// it never dispatches the request itself.
///
/// ```rust
/// use adaptive_router::AIRequest;
///
/// let request = AIRequest::new("Describe this picture")
///     .with_image("/tmp/cat.png")
///     .with_context("qualityTier", "performance");
/// assert!(request.has_image());
/// assert_eq!(request.quality_tier(), "performance");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIRequest {
    /// Request identifier
    pub id: String,
    /// Prompt text
    pub prompt: String,
    /// Optional path to an attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// Caller priority (informational, higher is more urgent)
    #[serde(default)]
    pub priority: i32,
    /// Free-form context, notably `qualityTier`
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl AIRequest {
    /// Create a new request with a generated id
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            image_path: None,
            priority: 0,
            context: HashMap::new(),
        }
    }

    /// Set an explicit id (builder pattern)
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach an image (builder pattern)
    pub fn with_image(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Set the priority (builder pattern)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Add a context entry (builder pattern)
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Whether a non-empty image path is attached
    pub fn has_image(&self) -> bool {
        self.image_path
            .as_deref()
            .is_some_and(|path| !path.trim().is_empty())
    }

    /// Image path if one is attached
    pub fn image(&self) -> Option<&str> {
        self.image_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }

    /// Requested quality tier, defaulting to `balanced`
    pub fn quality_tier(&self) -> &str {
        self.context
            .get(QUALITY_TIER_KEY)
            .map(String::as_str)
            .filter(|tier| !tier.is_empty())
            .unwrap_or(DEFAULT_QUALITY_TIER)
    }
}

/// Observed result of a dispatched request, reported back to the router
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// Whether the provider answered successfully
    pub success: bool,
    /// Wall-clock latency in seconds
    pub latency_secs: f64,
    /// Cost charged for the call
    pub cost: f64,
}

impl RequestOutcome {
    /// A successful call
    pub fn success(latency_secs: f64, cost: f64) -> Self {
        Self {
            success: true,
            latency_secs,
            cost,
        }
    }

    /// A failed call
    pub fn failure(latency_secs: f64) -> Self {
        Self {
            success: false,
            latency_secs,
            cost: 0.0,
        }
    }
}
