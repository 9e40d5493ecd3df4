//! Hiking Project trail search.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::instrument;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{LocationRef, RecordData, ResourceKind, Trail};

use super::non_empty;
use crate::client::UpstreamClient;

const PROVIDER: &str = "hikingproject";

/// Sentinel the provider reports for "never".
const UNKNOWN_CONDITION_DATE: &str = "1970-01-01 00:00:00";

#[derive(Debug, Deserialize)]
pub struct TrailSearchResponse {
    #[serde(default)]
    pub trails: Vec<TrailPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailPayload {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub star_votes: i64,
    #[serde(default)]
    pub summary: Option<String>,
    pub url: String,
    #[serde(default)]
    pub condition_status: Option<String>,
    #[serde(default)]
    pub condition_date: Option<String>,
}

/// Splits `2026-10-17 08:15:00` into its date and time halves.
pub fn split_condition_date(raw: Option<String>) -> (Option<String>, Option<String>) {
    let Some(raw) = non_empty(raw).filter(|r| r != UNKNOWN_CONDITION_DATE) else {
        return (None, None);
    };
    match raw.split_once(' ') {
        Some((date, time)) => (non_empty(Some(date.into())), non_empty(Some(time.into()))),
        None => (Some(raw), None),
    }
}

pub fn normalize(response: TrailSearchResponse) -> Result<Vec<RecordData>> {
    if response.trails.is_empty() {
        return Err(ExplorerError::no_data(PROVIDER));
    }

    Ok(response
        .trails
        .into_iter()
        .map(|t| {
            let (condition_date, condition_time) = split_condition_date(t.condition_date);
            RecordData::Trail(Trail {
                name: t.name,
                location: non_empty(t.location),
                length: t.length,
                stars: t.stars,
                star_votes: t.star_votes,
                summary: non_empty(t.summary),
                trail_url: t.url,
                conditions: non_empty(t.condition_status),
                condition_date,
                condition_time,
            })
        })
        .collect())
}

#[instrument(skip(client, location), fields(location_id = %location.id))]
pub(crate) async fn fetch(client: &UpstreamClient, location: &LocationRef) -> Result<Vec<RecordData>> {
    let config = client.config();
    let provider = config.provider(ResourceKind::Trail);
    let key = provider.require_key(PROVIDER)?;
    let url = provider.endpoint(PROVIDER)?;

    let request = client.http().get(url).query(&[
        ("lat", location.latitude.to_string()),
        ("lon", location.longitude.to_string()),
        ("maxDistance", config.trail_radius_miles.to_string()),
        ("key", key.to_string()),
    ]);

    let response: TrailSearchResponse = client.get_json(PROVIDER, request).await?;
    normalize(response)
}
