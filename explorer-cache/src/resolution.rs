//! Outcome of one `resolve` call.

use serde::Serialize;

use explorer_core::types::{LocationRef, Record, ResourceKind};

/// Where a resolution's records came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Fresh group read from the store
    Cache,
    /// Fetched from the provider and written through
    Upstream,
    /// The provider had nothing; nothing was stored
    NoData,
}

/// A resolved record group.
#[derive(Clone, Debug, Serialize)]
pub struct Resolution {
    /// Kind that was resolved
    pub kind: ResourceKind,
    /// The group, in store order; empty for [`ResolutionSource::NoData`]
    pub records: Vec<Record>,
    /// Where the records came from
    pub source: ResolutionSource,
}

impl Resolution {
    pub(crate) fn cached(kind: ResourceKind, records: Vec<Record>) -> Self {
        Self {
            kind,
            records,
            source: ResolutionSource::Cache,
        }
    }

    pub(crate) fn fetched(kind: ResourceKind, records: Vec<Record>) -> Self {
        Self {
            kind,
            records,
            source: ResolutionSource::Upstream,
        }
    }

    pub(crate) fn no_data(kind: ResourceKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
            source: ResolutionSource::NoData,
        }
    }

    /// True when the group is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when served from the store.
    pub fn is_hit(&self) -> bool {
        self.source == ResolutionSource::Cache
    }

    /// The location reference a location resolution produced.
    pub fn location_ref(&self) -> Option<LocationRef> {
        self.records.first().and_then(LocationRef::from_record)
    }

    /// Consumes the resolution, returning the records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
