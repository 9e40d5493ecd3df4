//! Resource kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// One of the fixed categories of upstream data.
///
/// Each kind has a fixed cache lifetime (see [`crate::expiry`]) and a fixed
/// set of normalized fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Geocoded search text
    Location,
    /// Daily forecast summaries
    Weather,
    /// Local events
    Event,
    /// Movies matching the city name
    Movie,
    /// Hiking trails near the location
    Trail,
    /// Businesses near the location
    Yelp,
}

impl ResourceKind {
    /// All kinds, location first.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Location,
        ResourceKind::Weather,
        ResourceKind::Event,
        ResourceKind::Movie,
        ResourceKind::Trail,
        ResourceKind::Yelp,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Location => "location",
            ResourceKind::Weather => "weather",
            ResourceKind::Event => "event",
            ResourceKind::Movie => "movie",
            ResourceKind::Trail => "trail",
            ResourceKind::Yelp => "yelp",
        }
    }

    /// True for the only kind addressed by free-text search.
    pub fn is_location(&self) -> bool {
        matches!(self, ResourceKind::Location)
    }

    /// True for kinds keyed by a location identifier.
    pub fn is_dependent(&self) -> bool {
        !self.is_location()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ExplorerError;

    /// Accepts the canonical name and the plural route spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "location" | "locations" => Ok(ResourceKind::Location),
            "weather" | "weathers" => Ok(ResourceKind::Weather),
            "event" | "events" => Ok(ResourceKind::Event),
            "movie" | "movies" => Ok(ResourceKind::Movie),
            "trail" | "trails" => Ok(ResourceKind::Trail),
            "yelp" | "yelps" => Ok(ResourceKind::Yelp),
            other => Err(ExplorerError::UnknownKind(other.to_string())),
        }
    }
}
