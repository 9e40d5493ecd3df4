//! In-memory record store.
//!
//! Fast, thread-safe storage suitable for development, testing,
//! and single-process deployments.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, instrument};

use explorer_core::error::{ExplorerError, Result};
use explorer_core::traits::RecordStore;
use explorer_core::types::{validate_group, Record, ResourceKind};

/// Operation counters for a [`MemoryStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// `read` calls
    pub reads: u64,
    /// `write` calls that persisted a group
    pub writes: u64,
    /// `delete` calls
    pub deletes: u64,
}

/// In-memory record store.
///
/// Groups live in a concurrent map keyed by (kind, key). A write appends the
/// whole group under the entry's shard lock, so readers never observe half
/// of it; two unguarded writes to one key accumulate both groups.
///
/// # Thread Safety
///
/// All operations are thread-safe and can be called concurrently.
#[derive(Debug)]
pub struct MemoryStore {
    /// Primary storage: (kind, key) → group
    groups: DashMap<(ResourceKind, String), Vec<Record>>,
    /// Next record identifier
    next_id: AtomicI64,
    /// Set once `close` has been called
    closed: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            next_id: AtomicI64::new(1),
            closed: AtomicBool::new(false),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
        }
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> MemoryStoreStats {
        MemoryStoreStats {
            reads: self.reads.load(Ordering::SeqCst),
            writes: self.writes.load(Ordering::SeqCst),
            deletes: self.deletes.load(Ordering::SeqCst),
        }
    }

    /// Total number of stored records across all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.value().len()).sum()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored groups of `kind`.
    pub fn group_count(&self, kind: ResourceKind) -> usize {
        self.groups.iter().filter(|g| g.key().0 == kind).count()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ExplorerError::StoreUnavailable("store is closed".into()));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    #[instrument(skip(self))]
    async fn read(&self, kind: ResourceKind, key: &str) -> Result<Vec<Record>> {
        self.ensure_open()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let group = self
            .groups
            .get(&(kind, key.to_string()))
            .map(|g| g.value().clone())
            .unwrap_or_default();

        debug!(%kind, key, count = group.len(), "Read group");
        Ok(group)
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn write(&self, kind: ResourceKind, records: &[Record]) -> Result<Vec<i64>> {
        self.ensure_open()?;
        validate_group(kind, records)?;

        let key = match records.first().and_then(|r| r.group_key()) {
            Some(k) => k.to_string(),
            None => return Ok(Vec::new()),
        };

        let mut ids = Vec::with_capacity(records.len());
        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let mut record = record.clone();
            record.id = Some(id);
            ids.push(id);
            stored.push(record);
        }

        self.groups
            .entry((kind, key.clone()))
            .or_default()
            .extend(stored);
        self.writes.fetch_add(1, Ordering::SeqCst);

        debug!(%kind, key, count = ids.len(), "Wrote group");
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<u64> {
        self.ensure_open()?;
        self.deletes.fetch_add(1, Ordering::SeqCst);

        let removed = self
            .groups
            .remove(&(kind, key.to_string()))
            .map(|(_, g)| g.len() as u64)
            .unwrap_or(0);

        debug!(%kind, key, removed, "Deleted group");
        Ok(removed)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
