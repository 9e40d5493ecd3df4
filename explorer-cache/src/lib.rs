//! # Explorer Cache
//!
//! The cache orchestrator: one generic read-through cycle over a
//! [`RecordStore`](explorer_core::RecordStore) and a
//! [`Fetcher`](explorer_core::Fetcher), parameterized by resource kind.
//!
//! ```text
//! resolve(kind, key)
//!   ├─ store.read ── fresh ──────────────────────────────► Cache
//!   ├─ stale ─► store.delete ─┐
//!   └─ empty ─────────────────┴─► fetch ─┬─ NoData ──────► NoData
//!                                        ├─ error ───────► Err (no write)
//!                                        └─ records ─► stamp ─► store.write ─► Upstream
//! ```
//!
//! Concurrent resolutions of the same (kind, key) are serialized when
//! single-flight is on (the default); later callers then see the group the
//! first one wrote.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod orchestrator;
mod resolution;
mod stats;

pub use orchestrator::{CacheOrchestrator, OrchestratorConfig};
pub use resolution::{Resolution, ResolutionSource};
pub use stats::OrchestratorStats;
