//! Common traits for Explorer.
//!
//! These traits define the seams the cache orchestrator is built on, so the
//! storage backend and the providers can be swapped or faked in tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LookupKey, Record, RecordData, ResourceKind};

// ═══════════════════════════════════════════════════════════════════════════════
// RECORD STORE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Persistent storage of record groups keyed by (kind, lookup key).
///
/// Implementations might use:
/// - In-memory maps (for testing/development)
/// - SQLite/libSQL (for production)
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Reads the group stored under `key`.
    ///
    /// Not-found is an empty group, never an error.
    async fn read(&self, kind: ResourceKind, key: &str) -> Result<Vec<Record>>;

    /// Writes a whole group atomically.
    ///
    /// Returns the assigned identifiers in input order. Either every record
    /// is persisted or none is.
    async fn write(&self, kind: ResourceKind, records: &[Record]) -> Result<Vec<i64>>;

    /// Deletes the group stored under `key`.
    ///
    /// Idempotent; returns the number of records removed.
    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<u64>;

    /// Ends the store's lifecycle. Later calls fail with `StoreUnavailable`.
    async fn close(&self) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// FETCHER TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Upstream provider access, one variant per resource kind.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches and normalizes the group for `key`.
    ///
    /// # Errors
    /// - `UpstreamUnavailable` on network, HTTP or payload failures
    /// - `NoData` when the provider answered with zero usable results
    async fn fetch(&self, kind: ResourceKind, key: &LookupKey) -> Result<Vec<RecordData>>;
}
