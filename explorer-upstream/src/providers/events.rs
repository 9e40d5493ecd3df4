//! Eventbrite event search.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::{debug, instrument};

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{Event, LocationRef, RecordData, ResourceKind};

use super::{day_label_from_local, non_empty};
use crate::client::UpstreamClient;

const PROVIDER: &str = "eventbrite";

#[derive(Debug, Deserialize)]
pub struct EventSearchResponse {
    #[serde(default)]
    pub events: Vec<EventPayload>,
}

#[derive(Debug, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub name: Option<TextField>,
    #[serde(default)]
    pub start: Option<EventStart>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextField {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventStart {
    /// Venue-local time, `2026-10-24T19:00:00`
    pub local: String,
}

/// Events missing a link, a name, or a parseable start are skipped.
pub fn normalize(response: EventSearchResponse) -> Result<Vec<RecordData>> {
    let total = response.events.len();
    let group: Vec<RecordData> = response
        .events
        .into_iter()
        .filter_map(|e| {
            let link = non_empty(e.url)?;
            let name = non_empty(e.name.and_then(|n| n.text))?;
            let event_date = day_label_from_local(&e.start?.local)?;
            Some(RecordData::Event(Event {
                link,
                name,
                event_date,
                summary: non_empty(e.summary),
            }))
        })
        .collect();

    if group.len() < total {
        debug!(skipped = total - group.len(), "Skipped incomplete events");
    }
    if group.is_empty() {
        return Err(ExplorerError::no_data(PROVIDER));
    }
    Ok(group)
}

#[instrument(skip(client, location), fields(location_id = %location.id))]
pub(crate) async fn fetch(client: &UpstreamClient, location: &LocationRef) -> Result<Vec<RecordData>> {
    let provider = client.config().provider(ResourceKind::Event);
    let token = provider.require_key(PROVIDER)?;
    let url = provider.endpoint(PROVIDER)?;

    let address = location.address().ok_or_else(|| {
        ExplorerError::InvalidLookup("event search needs formatted_query or search_query".into())
    })?;

    let request = client
        .http()
        .get(url)
        .query(&[("location.address", address), ("token", token)]);

    let response: EventSearchResponse = client.get_json(PROVIDER, request).await?;
    normalize(response)
}
