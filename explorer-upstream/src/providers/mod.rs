//! One module per provider: payload types, request, normalization.
//!
//! `normalize` functions are pure so payloads can be checked against
//! recorded JSON without a network.

pub mod events;
pub mod geocode;
pub mod movies;
pub mod trails;
pub mod weather;
pub mod yelp;

use chrono::{DateTime, NaiveDateTime};

use explorer_core::constants::DAY_LABEL_FORMAT;

/// Day label for a Unix timestamp in seconds (`Mon Oct 19 2026`, UTC).
pub fn day_label_from_unix(secs: i64) -> Option<String> {
    DateTime::from_timestamp(secs, 0).map(|t| t.format(DAY_LABEL_FORMAT).to_string())
}

/// Day label for a provider-local timestamp such as `2026-10-24T19:00:00`.
pub fn day_label_from_local(local: &str) -> Option<String> {
    NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|t| t.format(DAY_LABEL_FORMAT).to_string())
}

/// Empty strings become `None`.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
