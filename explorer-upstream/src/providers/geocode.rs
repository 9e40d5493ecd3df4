//! Google Geocoding.
//!
//! Wire types mirror the provider JSON; only the fields used are declared.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::instrument;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{Location, LookupKey, RecordData, ResourceKind};

use crate::client::UpstreamClient;

const PROVIDER: &str = "geocode";

/// Geocoding response body.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    /// `OK`, `ZERO_RESULTS`, `REQUEST_DENIED`, ...
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Keeps the first result. `search_query` is the normalized search text so
/// the record lands under the group key it was requested with.
pub fn normalize(search: &str, response: GeocodeResponse) -> Result<Vec<RecordData>> {
    match response.status.as_str() {
        "OK" | "" => {}
        "ZERO_RESULTS" => return Err(ExplorerError::no_data(PROVIDER)),
        other => {
            return Err(ExplorerError::upstream(
                PROVIDER,
                match response.error_message {
                    Some(msg) => format!("{}: {}", other, msg),
                    None => other.to_string(),
                },
            ))
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ExplorerError::no_data(PROVIDER))?;

    Ok(vec![RecordData::Location(Location {
        search_query: LookupKey::normalize_search(search),
        formatted_query: first.formatted_address,
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
    })])
}

#[instrument(skip(client))]
pub(crate) async fn fetch(client: &UpstreamClient, search: &str) -> Result<Vec<RecordData>> {
    let provider = client.config().provider(ResourceKind::Location);
    let key = provider.require_key(PROVIDER)?;
    let url = provider.endpoint(PROVIDER)?;

    let request = client
        .http()
        .get(url)
        .query(&[("address", search.trim()), ("key", key)]);

    let response: GeocodeResponse = client.get_json(PROVIDER, request).await?;
    normalize(search, response)
}
