//! Routing strategy types and definitions

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Provider-selection strategies
///
/// Parsed once at configuration time. Unknown names fall back to
/// [`Strategy::WeightedRoundRobin`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Lowest configured priority value first, ties broken by health
    Priority,
    /// Fewest in-flight requests first, ties broken by health
    LeastConnections,
    /// Lowest smoothed latency first
    ResponseTime,
    /// Healthiest provider inside the requested cost tier
    CostOptimized,
    /// Healthiest provider overall
    HealthBased,
    /// Random pick weighted by `weight x health`
    #[default]
    WeightedRoundRobin,
}

impl Strategy {
    /// Every strategy, in declaration order
    pub const ALL: [Strategy; 6] = [
        Strategy::Priority,
        Strategy::LeastConnections,
        Strategy::ResponseTime,
        Strategy::CostOptimized,
        Strategy::HealthBased,
        Strategy::WeightedRoundRobin,
    ];

    /// Canonical configuration name
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Priority => "PRIORITY",
            Strategy::LeastConnections => "LEAST_CONNECTIONS",
            Strategy::ResponseTime => "RESPONSE_TIME",
            Strategy::CostOptimized => "COST_OPTIMIZED",
            Strategy::HealthBased => "HEALTH_BASED",
            Strategy::WeightedRoundRobin => "WEIGHTED_ROUND_ROBIN",
        }
    }

    /// Parse a configuration value, falling back to the default on unknown input
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown routing strategy '{}', falling back to {}",
                value,
                Strategy::default()
            );
            Strategy::default()
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "PRIORITY" => Ok(Strategy::Priority),
            "LEAST_CONNECTIONS" | "LEAST_BUSY" => Ok(Strategy::LeastConnections),
            "RESPONSE_TIME" | "LEAST_LATENCY" | "LATENCY" => Ok(Strategy::ResponseTime),
            "COST_OPTIMIZED" | "COST" => Ok(Strategy::CostOptimized),
            "HEALTH_BASED" | "HEALTH" => Ok(Strategy::HealthBased),
            "WEIGHTED_ROUND_ROBIN" | "WEIGHTED" => Ok(Strategy::WeightedRoundRobin),
            _ => Err(format!("Unknown routing strategy: {}", s)),
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Strategy::parse_or_default(&raw))
    }
}

/// Point-in-time view of one provider, as ranked by the strategies
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Provider name
    pub name: String,
    /// Blended health score in `[0, 1]`
    pub health_score: f64,
    /// Smoothed normalized latency in `[0, 1]`
    pub ewma_latency: f64,
    /// Configured priority (lower is preferred)
    pub priority: u32,
    /// Configured weight
    pub weight: f64,
    /// Requests currently in flight
    pub active_requests: usize,
}
