//! DTOs for API requests and responses.

use serde::{Deserialize, Serialize};

use explorer_cache::OrchestratorStats;
use explorer_core::types::{LocationRef, LookupKey};

use crate::error::ApiError;

/// Query for `GET /location`.
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    /// Free-text search
    pub data: Option<String>,
}

impl LocationQuery {
    /// Builds the search key; blank text is a bad request.
    pub fn into_lookup(self) -> Result<LookupKey, ApiError> {
        match self.data {
            Some(text) if !text.trim().is_empty() => Ok(LookupKey::search(text)),
            _ => Err(ApiError::bad_request("missing query parameter 'data'")),
        }
    }
}

/// Query for the location-dependent routes: a previously resolved location.
#[derive(Debug, Default, Deserialize)]
pub struct LocationParams {
    /// Location id returned by `/location`
    pub id: Option<String>,
    /// Original search text
    pub search_query: Option<String>,
    /// Formatted address
    pub formatted_query: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
}

impl LocationParams {
    /// Builds the location key; `id`, `latitude` and `longitude` are required.
    pub fn into_lookup(self) -> Result<LookupKey, ApiError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("missing query parameter 'id'"))?;
        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(ApiError::bad_request(
                    "missing query parameters 'latitude' and 'longitude'",
                ))
            }
        };

        Ok(LookupKey::location(LocationRef {
            id,
            search_query: self.search_query,
            formatted_query: self.formatted_query,
            latitude,
            longitude,
        }))
    }
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the state was built
    pub uptime_seconds: u64,
}

/// Response for `GET /stats`.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Raw counters
    #[serde(flatten)]
    pub counters: OrchestratorStats,
    /// hits / (hits + misses)
    pub hit_rate: f64,
    /// Keys being resolved right now
    pub in_flight: usize,
}
