//! Durable per-provider model performance memory

use super::metrics::ModelMetrics;
use crate::storage::JsonStore;
use crate::utils::error::{Result, RouterError};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// model -> feature key -> metrics
pub type MetricsTable = BTreeMap<String, BTreeMap<String, ModelMetrics>>;

/// Current on-disk schema version
pub const PERFORMANCE_SCHEMA_VERSION: u32 = 1;

/// Persisted document body
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PerformanceDocument {
    provider: String,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    models: MetricsTable,
}

struct TrackerState {
    models: MetricsTable,
    /// Bumped on every mutation
    generation: u64,
}

/// Performance statistics for every model of one provider
///
/// Mutations are applied in memory under a lock, then the resulting snapshot
/// is written through [`JsonStore`]. Snapshots carry a generation number and
/// a snapshot older than the last one written is dropped, so concurrent
/// writers never roll the file back.
pub struct ModelPerformanceTracker {
    provider: String,
    path: Option<PathBuf>,
    store: JsonStore<PerformanceDocument>,
    state: RwLock<TrackerState>,
    /// Generation of the last snapshot on disk
    written: Mutex<u64>,
}

impl ModelPerformanceTracker {
    /// Tracker that never touches the filesystem
    pub fn in_memory(provider: impl Into<String>) -> Self {
        Self::with_table(provider.into(), None, MetricsTable::new())
    }

    /// Tracker backed by the file at `path`
    ///
    /// A missing file starts empty. An unversioned file holding the bare
    /// `model -> feature key -> metrics` map is read as schema 0 and rewritten
    /// in the current layout on the next update. An unreadable file is moved
    /// aside to `*.corrupt` and the tracker starts empty. A file from a newer
    /// schema version is left untouched and reported as an error.
    pub fn open(provider: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let provider = provider.into();
        let path = path.as_ref().to_path_buf();
        let store = JsonStore::<PerformanceDocument>::new(PERFORMANCE_SCHEMA_VERSION);

        let legacy = |raw: serde_json::Value| -> Result<PerformanceDocument> {
            Ok(PerformanceDocument {
                provider: provider.clone(),
                updated_at: Utc::now(),
                models: serde_json::from_value(raw)?,
            })
        };

        let models = match store.load_migrating(&path, legacy) {
            Ok(Some(doc)) => {
                if doc.provider != provider {
                    warn!(
                        "Performance file {:?} belongs to '{}', loading it for '{}'",
                        path, doc.provider, provider
                    );
                }
                info!(
                    "Loaded model performance for {} ({} models)",
                    provider,
                    doc.models.len()
                );
                doc.models
            }
            Ok(None) => {
                debug!("No performance file at {:?}, starting empty", path);
                MetricsTable::new()
            }
            Err(e @ (RouterError::Serialization(_) | RouterError::Persistence(_))) => {
                warn!("Performance file {:?} is unreadable: {}", path, e);
                store.quarantine(&path)?;
                MetricsTable::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self::with_table(provider, Some(path), models))
    }

    fn with_table(provider: String, path: Option<PathBuf>, models: MetricsTable) -> Self {
        Self {
            provider,
            path,
            store: JsonStore::new(PERFORMANCE_SCHEMA_VERSION),
            state: RwLock::new(TrackerState {
                models,
                generation: 0,
            }),
            written: Mutex::new(0),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Metrics for `(model, key)`; zero-valued when never observed
    pub fn get_metrics(&self, model: &str, key: &str) -> ModelMetrics {
        self.state
            .read()
            .models
            .get(model)
            .and_then(|keys| keys.get(key))
            .copied()
            .unwrap_or_default()
    }

    /// Metrics for each of `models` under `key`, in the same order
    pub fn metrics_for_key(&self, models: &[String], key: &str) -> Vec<ModelMetrics> {
        let state = self.state.read();
        models
            .iter()
            .map(|model| {
                state
                    .models
                    .get(model)
                    .and_then(|keys| keys.get(key))
                    .copied()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Record one observation and persist the result
    ///
    /// The in-memory update always applies; a persistence failure is returned
    /// but leaves the previous file intact.
    pub fn update_metrics(
        &self,
        model: &str,
        key: &str,
        success: bool,
        latency_secs: f64,
        cost: f64,
    ) -> Result<()> {
        let (generation, snapshot) = {
            let mut state = self.state.write();
            state
                .models
                .entry(model.to_string())
                .or_default()
                .entry(key.to_string())
                .or_default()
                .record(success, latency_secs, cost);
            state.generation += 1;

            let snapshot = self.path.as_ref().map(|_| state.models.clone());
            (state.generation, snapshot)
        };

        match snapshot {
            Some(models) => self.persist(generation, models),
            None => Ok(()),
        }
    }

    fn persist(&self, generation: u64, models: MetricsTable) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let mut written = self.written.lock();
        if generation <= *written {
            debug!(
                "Skipping stale snapshot {} (on disk: {})",
                generation, *written
            );
            return Ok(());
        }

        let doc = PerformanceDocument {
            provider: self.provider.clone(),
            updated_at: Utc::now(),
            models,
        };
        self.store.save(path, &doc)?;
        *written = generation;
        Ok(())
    }

    /// Copy of the full metrics table
    pub fn snapshot(&self) -> MetricsTable {
        self.state.read().models.clone()
    }
}

impl std::fmt::Debug for ModelPerformanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPerformanceTracker")
            .field("provider", &self.provider)
            .field("path", &self.path)
            .finish()
    }
}
