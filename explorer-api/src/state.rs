//! App state and environment configuration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use explorer_cache::{CacheOrchestrator, OrchestratorConfig};
use explorer_core::error::{ExplorerError, Result};
use explorer_core::traits::{Fetcher, RecordStore};
use explorer_core::types::ResourceKind;
use explorer_store::{SqlStore, StoreConfig};
use explorer_upstream::{UpstreamClient, UpstreamConfig};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Listen port
    pub port: u16,
    /// Record store location
    pub store: StoreConfig,
    /// Provider endpoints and keys
    pub upstream: UpstreamConfig,
    /// Orchestrator behaviour
    pub orchestrator: OrchestratorConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreConfig::default(),
            upstream: UpstreamConfig::default(),
            orchestrator: OrchestratorConfig::default(),
        }
    }
}

/// Environment variable holding each provider's key.
const API_KEY_VARS: [(ResourceKind, &str); 6] = [
    (ResourceKind::Location, "GEOCODE_API_KEY"),
    (ResourceKind::Weather, "WEATHER_API_KEY"),
    (ResourceKind::Event, "EVENTBRITE_API_KEY"),
    (ResourceKind::Movie, "MOVIE_API_KEY"),
    (ResourceKind::Yelp, "YELP_API_KEY"),
    (ResourceKind::Trail, "TRAIL_API_KEY"),
];

impl ApiConfig {
    /// Reads `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the config from a variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = var("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ExplorerError::ConfigError(format!("PORT '{}' is not a port", port)))?;
        }

        if let Some(url) = var("DATABASE_URL") {
            config.store.url = url;
        }
        config.store.auth_token = var("DATABASE_AUTH_TOKEN");

        for (kind, name) in API_KEY_VARS {
            if let Some(key) = var(name) {
                config.upstream = config.upstream.with_api_key(kind, key);
            }
        }

        if let Some(secs) = var("UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ExplorerError::ConfigError(format!("UPSTREAM_TIMEOUT_SECS '{}' is not a number", secs))
            })?;
            config.upstream = config.upstream.with_timeout(secs);
        }
        config.orchestrator.fetch_timeout = Some(Duration::from_secs(config.upstream.timeout_seconds));

        if let Some(flag) = var("SINGLE_FLIGHT") {
            config.orchestrator.single_flight = parse_flag(&flag).ok_or_else(|| {
                ExplorerError::ConfigError(format!("SINGLE_FLIGHT '{}' is not a boolean", flag))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Shared state behind every handler.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// The cache orchestrator
    pub orchestrator: CacheOrchestrator,
    started: Instant,
}

impl AppState {
    /// Opens the SQL store and builds the provider client.
    pub async fn open(config: ApiConfig) -> Result<Self> {
        let store = SqlStore::open(&config.store).await?;
        let fetcher = UpstreamClient::new(config.upstream.clone())?;

        let configured = config.upstream.configured_kinds();
        if configured.len() < ResourceKind::ALL.len() {
            let missing: Vec<_> = ResourceKind::ALL
                .into_iter()
                .filter(|k| !configured.contains(k))
                .map(|k| k.as_str())
                .collect();
            tracing::warn!(?missing, "Some providers have no API key");
        }

        info!(store = %config.store.url, "App state ready");
        Ok(Self::with_parts(config, Arc::new(store), Arc::new(fetcher)))
    }

    /// Builds the state from an explicit store and fetcher.
    pub fn with_parts(
        config: ApiConfig,
        store: Arc<dyn RecordStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let orchestrator =
            CacheOrchestrator::new(store, fetcher).with_config(config.orchestrator.clone());
        Self {
            config,
            orchestrator,
            started: Instant::now(),
        }
    }

    /// Seconds since the state was built.
    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ApiConfig::from_vars(|_| None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.store, StoreConfig::default());
        assert!(config.orchestrator.single_flight);
        assert!(config.upstream.configured_kinds().is_empty());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = ApiConfig::from_vars(vars(&[
            ("PORT", "8080"),
            ("DATABASE_URL", "libsql://explorer.turso.io"),
            ("DATABASE_AUTH_TOKEN", "secret"),
            ("GEOCODE_API_KEY", "g"),
            ("WEATHER_API_KEY", "w"),
            ("EVENTBRITE_API_KEY", "e"),
            ("MOVIE_API_KEY", "m"),
            ("YELP_API_KEY", "y"),
            ("TRAIL_API_KEY", "t"),
            ("UPSTREAM_TIMEOUT_SECS", "7"),
            ("SINGLE_FLIGHT", "off"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert!(config.store.is_remote());
        assert_eq!(config.store.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.upstream.configured_kinds().len(), 6);
        assert_eq!(config.upstream.weather.api_key.as_deref(), Some("w"));
        assert_eq!(config.upstream.timeout_seconds, 7);
        assert_eq!(config.orchestrator.fetch_timeout, Some(Duration::from_secs(7)));
        assert!(!config.orchestrator.single_flight);
    }

    #[test]
    fn test_bad_values_are_config_errors() {
        for pairs in [
            [("PORT", "eighty")],
            [("UPSTREAM_TIMEOUT_SECS", "-1")],
            [("SINGLE_FLIGHT", "maybe")],
        ] {
            let err = ApiConfig::from_vars(vars(&pairs)).unwrap_err();
            assert!(matches!(err, ExplorerError::ConfigError(_)));
        }
    }

    #[test]
    fn test_blank_values_ignored() {
        let config = ApiConfig::from_vars(vars(&[("YELP_API_KEY", " "), ("PORT", "")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.upstream.yelp.api_key.is_none());
    }
}
