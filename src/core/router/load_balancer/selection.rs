//! Provider selection for LoadBalancer

use super::core::LoadBalancer;
use crate::core::router::provider::ProviderHandle;
use crate::core::router::strategy::Candidate;
use crate::core::types::AIRequest;
use std::collections::HashMap;
use tracing::debug;

impl LoadBalancer {
    /// Choose a provider for `request` among `providers`
    ///
    /// Only registered providers are considered. Providers with an open
    /// circuit, and providers without vision support for image requests, are
    /// always excluded. Providers under the health floor are excluded unless
    /// that would leave nothing. Returns `None` when no candidate remains.
    pub fn select_provider<H: ProviderHandle>(
        &self,
        providers: &HashMap<String, H>,
        request: &AIRequest,
    ) -> Option<String> {
        let needs_vision = request.has_image();

        // Stable order keeps ties and round-robin cursors deterministic
        let mut names: Vec<&String> = providers.keys().collect();
        names.sort();

        let mut candidates = Vec::with_capacity(names.len());
        let mut untested = Vec::new();
        for name in names {
            let Some(entry) = self.entry(name) else {
                debug!("Skipping unregistered provider: {}", name);
                continue;
            };
            let handle = &providers[name];

            // Capability first, so an ineligible provider never takes a half-open probe
            if needs_vision && !handle.supports_vision() {
                continue;
            }
            if entry.breaker.lock().is_open() {
                debug!("Skipping provider with open circuit: {}", name);
                continue;
            }

            let metrics = entry.metrics.read();
            untested.push(metrics.total_requests == 0);
            candidates.push(Candidate {
                name: name.clone(),
                health_score: metrics.health_score,
                ewma_latency: metrics.ewma_latency,
                priority: handle.priority(),
                weight: handle.weight(),
                active_requests: handle.active_requests(),
            });
        }

        if candidates.is_empty() {
            debug!(request_id = %request.id, "No provider candidates available");
            return None;
        }

        let floor = self.health_config.min_health_score;
        let healthy: Vec<Candidate> = candidates
            .iter()
            .zip(&untested)
            .filter(|(c, untested)| **untested || c.health_score >= floor)
            .map(|(c, _)| c.clone())
            .collect();
        let pool = if healthy.is_empty() {
            debug!("All candidates below health floor {}, keeping them", floor);
            candidates
        } else {
            healthy
        };

        let strategy = self.strategy();
        let tiers = self.cost_tiers.read();
        let selected = self
            .executor
            .select(strategy, &pool, request.quality_tier(), &tiers)?;

        debug!(
            request_id = %request.id,
            provider = %selected.name,
            strategy = %strategy,
            health = selected.health_score,
            candidates = pool.len(),
            "Selected provider"
        );
        Some(selected.name.clone())
    }
}
