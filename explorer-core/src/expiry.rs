//! Expiry policy.
//!
//! Pure functions mapping a resource kind and a record age to fresh/stale.
//! Staleness is judged per group from one representative record.

use chrono::{DateTime, Duration, Utc};

use crate::constants::{
    EVENT_MAX_AGE_SECS, MOVIE_MAX_AGE_SECS, TRAIL_MAX_AGE_SECS, WEATHER_MAX_AGE_SECS,
    YELP_MAX_AGE_SECS,
};
use crate::types::{Record, ResourceKind};

/// Maximum age of a group of `kind`; `None` means it never expires.
pub fn max_age(kind: ResourceKind) -> Option<Duration> {
    let secs = match kind {
        ResourceKind::Location => return None,
        ResourceKind::Weather => WEATHER_MAX_AGE_SECS,
        ResourceKind::Event => EVENT_MAX_AGE_SECS,
        ResourceKind::Yelp => YELP_MAX_AGE_SECS,
        ResourceKind::Trail => TRAIL_MAX_AGE_SECS,
        ResourceKind::Movie => MOVIE_MAX_AGE_SECS,
    };
    Some(Duration::seconds(secs))
}

/// True when a record written at `created_at` is older than its kind allows.
///
/// The bound is exclusive: a record exactly `max_age` old is still fresh.
/// A `created_at` in the future counts as fresh.
pub fn is_stale(kind: ResourceKind, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match max_age(kind) {
        Some(limit) => now.signed_duration_since(created_at) > limit,
        None => false,
    }
}

/// Group-level staleness, judged from the first record.
///
/// An empty group is never stale (there is nothing to evict).
pub fn is_group_stale(kind: ResourceKind, group: &[Record], now: DateTime<Utc>) -> bool {
    group
        .first()
        .map(|r| is_stale(kind, r.created_at, now))
        .unwrap_or(false)
}
