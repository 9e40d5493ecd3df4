//! Provider configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use explorer_core::constants::{
    DEFAULT_EVENTS_URL, DEFAULT_GEOCODE_URL, DEFAULT_MOVIES_URL, DEFAULT_MOVIE_IMAGE_URL,
    DEFAULT_TRAILS_URL, DEFAULT_UPSTREAM_TIMEOUT_SECS, DEFAULT_WEATHER_URL, DEFAULT_YELP_URL,
    TRAIL_SEARCH_RADIUS_MILES,
};
use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::ResourceKind;

/// Provider name used in errors and logs.
pub fn provider_name(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Location => "geocode",
        ResourceKind::Weather => "darksky",
        ResourceKind::Event => "eventbrite",
        ResourceKind::Movie => "tmdb",
        ResourceKind::Trail => "hikingproject",
        ResourceKind::Yelp => "yelp",
    }
}

/// One provider endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Endpoint URL
    pub base_url: String,
    /// API key or token (optional until the provider is used)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Creates an endpoint without a key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Returns the key, or `ConfigError` naming the provider.
    pub fn require_key(&self, provider: &str) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ExplorerError::ConfigError(format!("{} API key not configured", provider)))
    }

    /// Parses `base_url`.
    pub fn endpoint(&self, provider: &str) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| {
            ExplorerError::ConfigError(format!(
                "{} base URL '{}' is invalid: {}",
                provider, self.base_url, e
            ))
        })
    }
}

/// Upstream client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Google Geocoding
    pub geocode: ProviderConfig,
    /// Dark Sky
    pub weather: ProviderConfig,
    /// Eventbrite
    pub events: ProviderConfig,
    /// TMDB
    pub movies: ProviderConfig,
    /// Prefix joined with TMDB `poster_path`
    pub movie_image_url: String,
    /// Yelp Fusion
    pub yelp: ProviderConfig,
    /// Hiking Project
    pub trails: ProviderConfig,
    /// Trail search radius in miles
    pub trail_radius_miles: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocode: ProviderConfig::new(DEFAULT_GEOCODE_URL),
            weather: ProviderConfig::new(DEFAULT_WEATHER_URL),
            events: ProviderConfig::new(DEFAULT_EVENTS_URL),
            movies: ProviderConfig::new(DEFAULT_MOVIES_URL),
            movie_image_url: DEFAULT_MOVIE_IMAGE_URL.into(),
            yelp: ProviderConfig::new(DEFAULT_YELP_URL),
            trails: ProviderConfig::new(DEFAULT_TRAILS_URL),
            trail_radius_miles: TRAIL_SEARCH_RADIUS_MILES,
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECS,
        }
    }
}

impl UpstreamConfig {
    /// Provider serving `kind`.
    pub fn provider(&self, kind: ResourceKind) -> &ProviderConfig {
        match kind {
            ResourceKind::Location => &self.geocode,
            ResourceKind::Weather => &self.weather,
            ResourceKind::Event => &self.events,
            ResourceKind::Movie => &self.movies,
            ResourceKind::Trail => &self.trails,
            ResourceKind::Yelp => &self.yelp,
        }
    }

    fn provider_mut(&mut self, kind: ResourceKind) -> &mut ProviderConfig {
        match kind {
            ResourceKind::Location => &mut self.geocode,
            ResourceKind::Weather => &mut self.weather,
            ResourceKind::Event => &mut self.events,
            ResourceKind::Movie => &mut self.movies,
            ResourceKind::Trail => &mut self.trails,
            ResourceKind::Yelp => &mut self.yelp,
        }
    }

    /// Sets the API key for the provider serving `kind`.
    pub fn with_api_key(mut self, kind: ResourceKind, key: impl Into<String>) -> Self {
        self.provider_mut(kind).api_key = Some(key.into());
        self
    }

    /// Points the provider serving `kind` at another URL.
    pub fn with_base_url(mut self, kind: ResourceKind, url: impl Into<String>) -> Self {
        self.provider_mut(kind).base_url = url.into();
        self
    }

    /// Sets the poster image prefix.
    pub fn with_movie_image_url(mut self, url: impl Into<String>) -> Self {
        self.movie_image_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Kinds whose provider has a key configured.
    pub fn configured_kinds(&self) -> Vec<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .filter(|k| self.provider(*k).require_key(provider_name(*k)).is_ok())
            .collect()
    }
}
