//! Provider ranking methods for the different routing strategies
//!
//! Every method receives a non-empty, name-sorted candidate slice. Ties keep
//! the first candidate so results are deterministic for a given input.

use super::types::Candidate;
use rand::Rng;
use rand::rngs::StdRng;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tracing::debug;

/// Selection methods for the strategy executor
pub(super) struct SelectionMethods;

impl SelectionMethods {
    /// Round-robin selection, used when every weight is zero
    pub fn select_round_robin<'a>(
        candidates: &'a [Candidate],
        counter: &AtomicUsize,
    ) -> &'a Candidate {
        let index = counter.fetch_add(1, AtomicOrdering::Relaxed) % candidates.len();
        debug!(
            "Round-robin selected provider at index {}: {}",
            index, candidates[index].name
        );
        &candidates[index]
    }

    /// Lowest priority value, ties broken by higher health
    pub fn select_priority(candidates: &[Candidate]) -> &Candidate {
        let best = Self::best_by(candidates, |a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| b.health_score.total_cmp(&a.health_score))
        });
        debug!(
            "Priority selected provider: {} (priority: {})",
            best.name, best.priority
        );
        best
    }

    /// Fewest active requests, ties broken by higher health
    pub fn select_least_connections(candidates: &[Candidate]) -> &Candidate {
        let best = Self::best_by(candidates, |a, b| {
            a.active_requests
                .cmp(&b.active_requests)
                .then_with(|| b.health_score.total_cmp(&a.health_score))
        });
        debug!(
            "Least-connections selected provider: {} (active requests: {})",
            best.name, best.active_requests
        );
        best
    }

    /// Lowest smoothed latency
    pub fn select_response_time(candidates: &[Candidate]) -> &Candidate {
        let best = Self::best_by(candidates, |a, b| {
            a.ewma_latency
                .total_cmp(&b.ewma_latency)
                .then_with(|| b.health_score.total_cmp(&a.health_score))
        });
        debug!(
            "Response-time selected provider: {} (ewma latency: {:.3})",
            best.name, best.ewma_latency
        );
        best
    }

    /// Highest health score
    pub fn select_health_based(candidates: &[Candidate]) -> &Candidate {
        let best = Self::best_by(candidates, |a, b| b.health_score.total_cmp(&a.health_score));
        debug!(
            "Health-based selected provider: {} (health: {:.3})",
            best.name, best.health_score
        );
        best
    }

    /// Weighted random selection with weight `config.weight x health`
    pub fn select_weighted<'a>(
        candidates: &'a [Candidate],
        rng: &mut StdRng,
        counter: &AtomicUsize,
    ) -> &'a Candidate {
        let weights: Vec<f64> = candidates
            .iter()
            .map(|c| {
                let weight = c.weight.max(0.0) * c.health_score.max(0.0);
                if weight.is_finite() { weight } else { 0.0 }
            })
            .collect();
        let total_weight: f64 = weights.iter().sum();

        if total_weight <= 0.0 {
            return Self::select_round_robin(candidates, counter);
        }

        let mut random = rng.gen_range(0.0..total_weight);
        for (candidate, weight) in candidates.iter().zip(&weights) {
            if random < *weight {
                debug!(
                    "Weighted selected provider: {} (weight: {:.3} of {:.3})",
                    candidate.name, weight, total_weight
                );
                return candidate;
            }
            random -= weight;
        }

        // Float rounding can leave a sliver past the last bucket
        candidates
            .iter()
            .zip(&weights)
            .rev()
            .find(|(_, weight)| **weight > 0.0)
            .map(|(candidate, _)| candidate)
            .unwrap_or(&candidates[0])
    }

    /// First candidate that no other candidate orders strictly before
    fn best_by<F>(candidates: &[Candidate], mut compare: F) -> &Candidate
    where
        F: FnMut(&Candidate, &Candidate) -> Ordering,
    {
        let mut best = &candidates[0];
        for candidate in &candidates[1..] {
            if compare(candidate, best) == Ordering::Less {
                best = candidate;
            }
        }
        best
    }
}
