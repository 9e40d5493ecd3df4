//! Read-through cache over a record store and an upstream fetcher.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument, warn};

use explorer_core::clock::{Clock, SystemClock};
use explorer_core::error::{ExplorerError, Result};
use explorer_core::expiry;
use explorer_core::traits::{Fetcher, RecordStore};
use explorer_core::types::{LookupKey, Record, RecordData, ResourceKind};

use crate::resolution::Resolution;
use crate::stats::{Counters, OrchestratorStats};

/// Orchestrator configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Serialize resolutions of the same (kind, key)
    pub single_flight: bool,
    /// Upper bound on one provider call
    pub fetch_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
            fetch_timeout: None,
        }
    }
}

impl OrchestratorConfig {
    /// Turns single-flight on or off.
    pub fn with_single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// Bounds every provider call.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }
}

type FlightKey = (ResourceKind, String);
type FlightMap = DashMap<FlightKey, Arc<Mutex<()>>>;

/// Holds one (kind, key) slot; the map entry is dropped with the last holder.
struct Flight<'a> {
    map: &'a FlightMap,
    key: FlightKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<'a> Flight<'a> {
    async fn join(map: &'a FlightMap, key: FlightKey) -> Flight<'a> {
        let lock = map
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        Flight {
            map,
            key,
            guard: Some(guard),
        }
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        // Release our Arc before checking whether anyone else still holds one.
        self.guard.take();
        self.map
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// The cache orchestrator.
///
/// `resolve` is the only entry point: read the stored group, serve it while
/// fresh, otherwise evict it, fetch, stamp and write through.
///
/// # Example
///
/// ```rust,ignore
/// let orchestrator = CacheOrchestrator::new(store, fetcher);
/// let location = orchestrator
///     .resolve(ResourceKind::Location, &LookupKey::search("seattle"))
///     .await?;
/// ```
pub struct CacheOrchestrator {
    store: Arc<dyn RecordStore>,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    config: OrchestratorConfig,
    flights: FlightMap,
    counters: Counters,
}

impl CacheOrchestrator {
    /// Creates an orchestrator with the default config and the wall clock.
    pub fn new(store: Arc<dyn RecordStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            config: OrchestratorConfig::default(),
            flights: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Returns a snapshot of the counters.
    pub fn stats(&self) -> OrchestratorStats {
        self.counters.snapshot()
    }

    /// Number of (kind, key) slots currently held or awaited.
    pub fn in_flight(&self) -> usize {
        self.flights.len()
    }

    /// Closes the underlying store.
    pub async fn close(&self) -> Result<()> {
        self.store.close().await
    }

    /// Resolves the group for `key`.
    ///
    /// # Errors
    /// - `InvalidLookup` if `key` cannot address `kind`
    /// - `StoreUnavailable` / `ConstraintViolation` from the store
    /// - `UpstreamUnavailable` from the fetcher or a fetch timeout
    ///
    /// A provider `NoData` is not an error: it yields an empty resolution
    /// and nothing is written.
    #[instrument(skip(self, key))]
    pub async fn resolve(&self, kind: ResourceKind, key: &LookupKey) -> Result<Resolution> {
        key.validate_for(kind)?;
        let store_key = key.store_key();

        if !self.config.single_flight {
            return self.resolve_unguarded(kind, key, &store_key).await;
        }

        let _flight = Flight::join(&self.flights, (kind, store_key.clone())).await;
        self.resolve_unguarded(kind, key, &store_key).await
    }

    async fn resolve_unguarded(
        &self,
        kind: ResourceKind,
        key: &LookupKey,
        store_key: &str,
    ) -> Result<Resolution> {
        let group = self.store.read(kind, store_key).await?;

        if !group.is_empty() {
            if !expiry::is_group_stale(kind, &group, self.clock.now()) {
                Counters::bump(&self.counters.hits);
                debug!(key = store_key, count = group.len(), "Cache hit");
                return Ok(Resolution::cached(kind, group));
            }

            let removed = self.store.delete(kind, store_key).await?;
            Counters::bump(&self.counters.evictions);
            debug!(key = store_key, removed, "Evicted stale group");
        }

        Counters::bump(&self.counters.misses);
        debug!(key = store_key, "Cache miss, fetching");

        let data = match self.fetch(kind, key).await {
            Ok(data) if !data.is_empty() => data,
            Ok(_) => {
                Counters::bump(&self.counters.empty_results);
                debug!(key = store_key, "Provider returned an empty group");
                return Ok(Resolution::no_data(kind));
            }
            Err(e) if e.is_no_data() => {
                Counters::bump(&self.counters.empty_results);
                debug!(key = store_key, "No data upstream");
                return Ok(Resolution::no_data(kind));
            }
            Err(e) => {
                Counters::bump(&self.counters.fetch_failures);
                warn!(key = store_key, error = %e, "Fetch failed");
                return Err(e);
            }
        };

        let mut records = self.stamp(kind, store_key, data);
        let ids = self.store.write(kind, &records).await?;
        if ids.len() != records.len() {
            return Err(ExplorerError::InternalError(format!(
                "store returned {} ids for {} records",
                ids.len(),
                records.len()
            )));
        }
        for (record, id) in records.iter_mut().zip(ids) {
            record.id = Some(id);
        }
        Counters::bump(&self.counters.writes);

        info!(key = store_key, count = records.len(), "Stored fresh group");
        Ok(Resolution::fetched(kind, records))
    }

    async fn fetch(&self, kind: ResourceKind, key: &LookupKey) -> Result<Vec<RecordData>> {
        let call = self.fetcher.fetch(kind, key);
        match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                ExplorerError::upstream(kind.as_str(), format!("timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }

    /// Attaches the group key and a common `created_at`.
    fn stamp(&self, kind: ResourceKind, store_key: &str, data: Vec<RecordData>) -> Vec<Record> {
        let now = self.clock.now();
        data.into_iter()
            .map(|mut data| {
                if let RecordData::Location(location) = &mut data {
                    location.search_query = store_key.to_string();
                }
                let record = Record::new(data, now);
                if kind.is_dependent() {
                    record.with_location_id(store_key)
                } else {
                    record
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for CacheOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheOrchestrator")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
