//! Catalog manager.

use super::fallback::fallback_models;
use crate::client::JobApi;
use crate::clock::{Clock, TokioClock};
use crate::types::ModelDescriptor;
use crate::{Error, ErrorContext, Result};
use arc_swap::ArcSwapOption;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Where a snapshot's models came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Live,
    Fallback,
}

/// Immutable point-in-time copy of the registry.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub models: Vec<ModelDescriptor>,
    pub fetched_at: Instant,
    pub source: SnapshotSource,
}

impl CatalogSnapshot {
    /// Exact id match first, then a case-insensitive display name match.
    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .or_else(|| self.models.iter().find(|m| m.display_name.eq_ignore_ascii_case(id)))
    }

    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub ttl: Duration,
    /// Hand the previous snapshot to callers arriving while a refresh is in
    /// flight instead of making them wait for it.
    pub serve_stale_while_refreshing: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            serve_stale_while_refreshing: false,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_serve_stale(mut self, enabled: bool) -> Self {
        self.serve_stale_while_refreshing = enabled;
        self
    }
}

/// Cached view of the model registry.
///
/// Reads are lock-free. At most one registry call is in flight at a time;
/// concurrent callers that find the snapshot expired wait for that call
/// instead of issuing their own.
pub struct ModelCatalog {
    api: Arc<dyn JobApi>,
    clock: Arc<dyn Clock>,
    config: CatalogConfig,
    snapshot: ArcSwapOption<CatalogSnapshot>,
    refresh: Mutex<()>,
    registry_calls: AtomicU64,
}

impl ModelCatalog {
    pub fn new(api: Arc<dyn JobApi>, config: CatalogConfig) -> Self {
        Self::with_clock(api, config, Arc::new(TokioClock))
    }

    pub fn with_clock(api: Arc<dyn JobApi>, config: CatalogConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            config,
            snapshot: ArcSwapOption::from(None),
            refresh: Mutex::new(()),
            registry_calls: AtomicU64::new(0),
        }
    }

    /// Current snapshot, refreshing it first when older than the TTL.
    ///
    /// Never fails: a registry failure yields the fallback snapshot.
    pub async fn get_models(&self) -> Arc<CatalogSnapshot> {
        if let Some(fresh) = self.fresh_snapshot() {
            return fresh;
        }

        let _guard = match self.refresh.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                if self.config.serve_stale_while_refreshing {
                    if let Some(prior) = self.snapshot.load_full() {
                        debug!("refresh in flight, serving prior snapshot");
                        return prior;
                    }
                }
                self.refresh.lock().await
            }
        };

        // a refresh may have completed while we were waiting for the lock
        if let Some(fresh) = self.fresh_snapshot() {
            return fresh;
        }
        self.refresh_locked().await
    }

    /// Resolve one model by id (or display name).
    pub async fn get_model(&self, id: &str) -> Result<ModelDescriptor> {
        let snapshot = self.get_models().await;
        snapshot.find(id).cloned().ok_or_else(|| {
            Error::not_found_with_context(
                format!("model '{}' is not in the catalog", id),
                ErrorContext::new().with_model_id(id),
            )
        })
    }

    /// Drop the cached snapshot so the next read refreshes.
    pub fn invalidate(&self) {
        self.snapshot.store(None);
    }

    /// Number of registry calls issued so far.
    pub fn registry_calls(&self) -> u64 {
        self.registry_calls.load(Ordering::Relaxed)
    }

    fn fresh_snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        let current = self.snapshot.load_full()?;
        current
            .is_fresh(self.clock.now(), self.config.ttl)
            .then_some(current)
    }

    async fn refresh_locked(&self) -> Arc<CatalogSnapshot> {
        self.registry_calls.fetch_add(1, Ordering::Relaxed);
        let snapshot = match self.api.list_models().await {
            Ok(models) => {
                info!(count = models.len(), "model catalog refreshed");
                CatalogSnapshot {
                    models,
                    fetched_at: self.clock.now(),
                    source: SnapshotSource::Live,
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    kind = e.kind().name(),
                    "model registry unavailable, serving fallback list"
                );
                CatalogSnapshot {
                    models: fallback_models(),
                    fetched_at: self.clock.now(),
                    source: SnapshotSource::Fallback,
                }
            }
        };
        let snapshot = Arc::new(snapshot);
        self.snapshot.store(Some(snapshot.clone()));
        snapshot
    }
}
