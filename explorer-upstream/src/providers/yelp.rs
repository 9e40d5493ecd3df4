//! Yelp Fusion business search.

#![allow(missing_docs)]

use serde::Deserialize;
use tracing::instrument;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{LocationRef, RecordData, ResourceKind, YelpBusiness};

use super::non_empty;
use crate::client::UpstreamClient;

const PROVIDER: &str = "yelp";

#[derive(Debug, Deserialize)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub businesses: Vec<BusinessPayload>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessPayload {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub url: String,
}

pub fn normalize(response: BusinessSearchResponse) -> Result<Vec<RecordData>> {
    if response.businesses.is_empty() {
        return Err(ExplorerError::no_data(PROVIDER));
    }

    Ok(response
        .businesses
        .into_iter()
        .map(|b| {
            RecordData::Yelp(YelpBusiness {
                name: b.name,
                image_url: non_empty(b.image_url),
                price: non_empty(b.price),
                rating: b.rating,
                url: b.url,
            })
        })
        .collect())
}

#[instrument(skip(client, location), fields(location_id = %location.id))]
pub(crate) async fn fetch(client: &UpstreamClient, location: &LocationRef) -> Result<Vec<RecordData>> {
    let provider = client.config().provider(ResourceKind::Yelp);
    let key = provider.require_key(PROVIDER)?;
    let url = provider.endpoint(PROVIDER)?;

    let request = client
        .http()
        .get(url)
        .bearer_auth(key)
        .query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
        ]);

    let response: BusinessSearchResponse = client.get_json(PROVIDER, request).await?;
    normalize(response)
}
