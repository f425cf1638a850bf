//! Helpers that push providers into known health states

use adaptive_router::{AIRequest, LoadBalancer, ProviderHandle};
use std::collections::HashMap;

/// Ten fast, cheap successes
pub fn drive_healthy(lb: &LoadBalancer, name: &str) {
    for _ in 0..10 {
        lb.update_provider_metrics(name, true, 0.3, 0.001);
    }
}

/// Slow, mostly failing traffic that stays under the breaker threshold
///
/// Successes are interleaved so the default breaker (3 failures) stays closed.
pub fn drive_failing(lb: &LoadBalancer, name: &str) {
    for _ in 0..2 {
        lb.update_provider_metrics(name, false, 14.0, 0.0);
        lb.update_provider_metrics(name, true, 14.0, 0.0);
    }
}

/// How often each provider is chosen over `rounds` selections
pub fn selection_counts<H: ProviderHandle>(
    lb: &LoadBalancer,
    providers: &HashMap<String, H>,
    request: &AIRequest,
    rounds: usize,
) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for _ in 0..rounds {
        if let Some(name) = lb.select_provider(providers, request) {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}
