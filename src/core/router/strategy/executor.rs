//! Strategy executor for provider selection

use super::selection::SelectionMethods;
use super::types::{Candidate, Strategy};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::atomic::AtomicUsize;
use tracing::debug;

/// Ranks candidate providers according to a [`Strategy`]
///
/// Holds the only mutable selection state: the round-robin cursor and the
/// random source for weighted picks.
pub struct StrategyExecutor {
    /// Round-robin counter
    round_robin_counter: AtomicUsize,
    /// Random source for weighted selection
    rng: Mutex<StdRng>,
}

impl StrategyExecutor {
    /// Create an executor seeded from OS entropy
    pub fn new() -> Self {
        Self {
            round_robin_counter: AtomicUsize::new(0),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create an executor with a fixed seed (for reproducible selection)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            round_robin_counter: AtomicUsize::new(0),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Pick one candidate, or `None` when `candidates` is empty
    ///
    /// `quality_tier` and `cost_tiers` are only consulted by
    /// [`Strategy::CostOptimized`].
    pub fn select<'a>(
        &self,
        strategy: Strategy,
        candidates: &'a [Candidate],
        quality_tier: &str,
        cost_tiers: &HashMap<String, Vec<String>>,
    ) -> Option<&'a Candidate> {
        if candidates.is_empty() {
            return None;
        }

        let selected = match strategy {
            Strategy::Priority => SelectionMethods::select_priority(candidates),
            Strategy::LeastConnections => SelectionMethods::select_least_connections(candidates),
            Strategy::ResponseTime => SelectionMethods::select_response_time(candidates),
            Strategy::HealthBased => SelectionMethods::select_health_based(candidates),
            Strategy::WeightedRoundRobin => {
                let mut rng = self.rng.lock();
                SelectionMethods::select_weighted(candidates, &mut rng, &self.round_robin_counter)
            }
            Strategy::CostOptimized => {
                return self.select_cost_optimized(candidates, quality_tier, cost_tiers);
            }
        };
        Some(selected)
    }

    /// Healthiest candidate inside the requested tier
    ///
    /// Unknown or empty tiers, and tiers with no surviving member, widen to the
    /// full candidate set.
    fn select_cost_optimized<'a>(
        &self,
        candidates: &'a [Candidate],
        quality_tier: &str,
        cost_tiers: &HashMap<String, Vec<String>>,
    ) -> Option<&'a Candidate> {
        let in_tier: Vec<Candidate> = match cost_tiers.get(quality_tier) {
            Some(members) if !members.is_empty() => candidates
                .iter()
                .filter(|c| members.contains(&c.name))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        let chosen_name = if in_tier.is_empty() {
            debug!(
                "Cost tier '{}' has no eligible providers, using all candidates",
                quality_tier
            );
            SelectionMethods::select_health_based(candidates).name.clone()
        } else {
            SelectionMethods::select_health_based(&in_tier).name.clone()
        };

        debug!(
            "Cost-optimized selected provider: {} (tier: {})",
            chosen_name, quality_tier
        );
        candidates.iter().find(|c| c.name == chosen_name)
    }
}

impl Default for StrategyExecutor {
    fn default() -> Self {
        Self::new()
    }
}
