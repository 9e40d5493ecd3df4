//! Constants for Explorer.
//!
//! Cache lifetimes are design constants, not configuration. Provider defaults
//! are only defaults: every base URL can be overridden in the upstream config.

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE LIFETIMES (seconds)
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum age of a weather group.
/// Forecasts change fastest; the short bound also keeps staleness observable.
pub const WEATHER_MAX_AGE_SECS: i64 = 15;

/// Maximum age of an event group (6 hours).
pub const EVENT_MAX_AGE_SECS: i64 = 6 * 60 * 60;

/// Maximum age of a Yelp group (24 hours).
pub const YELP_MAX_AGE_SECS: i64 = 24 * 60 * 60;

/// Maximum age of a trail group (7 days).
pub const TRAIL_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Maximum age of a movie group (30 days).
pub const MOVIE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

// ═══════════════════════════════════════════════════════════════════════════════
// PROVIDER DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Google Geocoding API base URL.
pub const DEFAULT_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Dark Sky forecast API base URL.
pub const DEFAULT_WEATHER_URL: &str = "https://api.darksky.net/forecast";

/// Eventbrite event search base URL.
pub const DEFAULT_EVENTS_URL: &str = "https://www.eventbriteapi.com/v3/events/search";

/// TMDB movie search base URL.
pub const DEFAULT_MOVIES_URL: &str = "https://api.themoviedb.org/3/search/movie";

/// TMDB poster image prefix.
pub const DEFAULT_MOVIE_IMAGE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Yelp Fusion business search base URL.
pub const DEFAULT_YELP_URL: &str = "https://api.yelp.com/v3/businesses/search";

/// Hiking Project trail search base URL.
pub const DEFAULT_TRAILS_URL: &str = "https://www.hikingproject.com/data/get-trails";

/// Default upstream request timeout in seconds.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Search radius (miles) sent to the trail provider.
pub const TRAIL_SEARCH_RADIUS_MILES: u32 = 10;

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATS
// ═══════════════════════════════════════════════════════════════════════════════

/// Day label used for weather `time` and event `event_date`, e.g. `Mon Oct 19 2026`.
pub const DAY_LABEL_FORMAT: &str = "%a %b %d %Y";

/// Message returned to HTTP callers for every server-side failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry, something went wrong";
