//! Dark Sky daily forecast.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::instrument;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{LocationRef, RecordData, ResourceKind, Weather};

use super::day_label_from_unix;
use crate::client::UpstreamClient;

const PROVIDER: &str = "darksky";

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily: Option<Daily>,
}

#[derive(Debug, Deserialize)]
pub struct Daily {
    #[serde(default)]
    pub data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize)]
pub struct DailyPoint {
    /// Unix seconds at local midnight
    pub time: i64,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One record per day, in provider order.
pub fn normalize(response: ForecastResponse) -> Result<Vec<RecordData>> {
    let days = response.daily.map(|d| d.data).unwrap_or_default();
    if days.is_empty() {
        return Err(ExplorerError::no_data(PROVIDER));
    }

    days.into_iter()
        .map(|day| {
            let time = day_label_from_unix(day.time).ok_or_else(|| {
                ExplorerError::upstream(PROVIDER, format!("timestamp {} out of range", day.time))
            })?;
            Ok(RecordData::Weather(Weather {
                forecast: day.summary.unwrap_or_default(),
                time,
            }))
        })
        .collect()
}

#[instrument(skip(client, location), fields(location_id = %location.id))]
pub(crate) async fn fetch(client: &UpstreamClient, location: &LocationRef) -> Result<Vec<RecordData>> {
    let provider = client.config().provider(ResourceKind::Weather);
    let key = provider.require_key(PROVIDER)?;
    let mut url = provider.endpoint(PROVIDER)?;

    // /forecast/<key>/<lat>,<lon>
    url.path_segments_mut()
        .map_err(|_| {
            ExplorerError::ConfigError(format!("{} base URL cannot take a path", PROVIDER))
        })?
        .pop_if_empty()
        .push(key)
        .push(&format!("{},{}", location.latitude, location.longitude));

    let request = client.http().get(url).query(&[("exclude", "currently,minutely,hourly")]);
    let response: ForecastResponse = client.get_json(PROVIDER, request).await?;
    normalize(response)
}
