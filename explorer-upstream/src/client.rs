//! HTTP client shared by every provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use explorer_core::error::{ExplorerError, Result};
use explorer_core::traits::Fetcher;
use explorer_core::types::{LookupKey, RecordData, ResourceKind};

use crate::config::{provider_name, UpstreamConfig};
use crate::providers;

/// Upstream fetcher backed by the real provider APIs.
///
/// # Example
///
/// ```rust,ignore
/// let client = UpstreamClient::new(
///     UpstreamConfig::default().with_api_key(ResourceKind::Location, key),
/// )?;
/// let group = client.fetch(ResourceKind::Location, &LookupKey::search("seattle")).await?;
/// ```
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Creates a client; fails only if the TLS backend cannot initialize.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExplorerError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Sends `request` and decodes a JSON body.
    ///
    /// Network failures, non-2xx statuses and undecodable bodies all map to
    /// `UpstreamUnavailable`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ExplorerError::upstream(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(provider, %status, "Provider returned an error status");
            return Err(ExplorerError::upstream(
                provider,
                format!("HTTP {}: {}", status, truncate(&body, 200)),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExplorerError::upstream(provider, e))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| ExplorerError::upstream(provider, format!("undecodable payload: {}", e)))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

#[async_trait]
impl Fetcher for UpstreamClient {
    #[instrument(skip(self, key), fields(provider = provider_name(kind)))]
    async fn fetch(&self, kind: ResourceKind, key: &LookupKey) -> Result<Vec<RecordData>> {
        key.validate_for(kind)?;

        let group = match (kind, key) {
            (ResourceKind::Location, LookupKey::Search(text)) => {
                providers::geocode::fetch(self, text).await?
            }
            (_, LookupKey::Location(location)) => match kind {
                ResourceKind::Weather => providers::weather::fetch(self, location).await?,
                ResourceKind::Event => providers::events::fetch(self, location).await?,
                ResourceKind::Movie => providers::movies::fetch(self, location).await?,
                ResourceKind::Yelp => providers::yelp::fetch(self, location).await?,
                ResourceKind::Trail => providers::trails::fetch(self, location).await?,
                ResourceKind::Location => {
                    return Err(ExplorerError::InternalError(
                        "location lookup passed validation with a location key".into(),
                    ))
                }
            },
            (_, LookupKey::Search(_)) => {
                return Err(ExplorerError::InternalError(format!(
                    "{} lookup passed validation with a search key",
                    kind
                )))
            }
        };

        debug!(%kind, count = group.len(), "Fetched group");
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_mismatched_key_rejected_before_network() {
        let client = UpstreamClient::new(UpstreamConfig::default()).unwrap();
        let err = client
            .fetch(ResourceKind::Weather, &LookupKey::search("seattle"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidLookup(_)));
    }
}
