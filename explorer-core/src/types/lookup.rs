//! Lookup keys.
//!
//! A location is found by the text the user searched for; every other kind
//! hangs off a location that was already resolved.

use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::types::{Record, RecordData, ResourceKind};

/// Reference to a resolved location, as handed to dependent kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    /// Store-assigned location identifier
    pub id: String,
    /// Original search text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Provider's formatted address (events and movies search by it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_query: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl LocationRef {
    /// Creates a reference from coordinates alone.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            search_query: None,
            formatted_query: None,
            latitude,
            longitude,
        }
    }

    /// Adds the formatted address.
    pub fn with_formatted_query(mut self, formatted_query: impl Into<String>) -> Self {
        self.formatted_query = Some(formatted_query.into());
        self
    }

    /// Builds a reference from a stored location record.
    ///
    /// Returns `None` for non-location records or records not yet written.
    pub fn from_record(record: &Record) -> Option<Self> {
        match (&record.data, record.id) {
            (RecordData::Location(loc), Some(id)) => Some(Self {
                id: id.to_string(),
                search_query: Some(loc.search_query.clone()),
                formatted_query: Some(loc.formatted_query.clone()),
                latitude: loc.latitude,
                longitude: loc.longitude,
            }),
            _ => None,
        }
    }

    /// Address text for searches: the formatted address, else the search text.
    pub fn address(&self) -> Option<&str> {
        [self.formatted_query.as_deref(), self.search_query.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|q| !q.is_empty())
    }

    /// City part of the formatted address ("Seattle, WA, USA" → "Seattle").
    ///
    /// Falls back to the search text.
    pub fn city(&self) -> Option<&str> {
        self.formatted_query
            .as_deref()
            .or(self.search_query.as_deref())
            .and_then(|q| q.split(',').next())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// How a resolution request addresses its record group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKey {
    /// Free-text location search
    Search(String),
    /// A resolved location (all dependent kinds)
    Location(LocationRef),
}

impl LookupKey {
    /// Creates a free-text search key.
    pub fn search(text: impl Into<String>) -> Self {
        LookupKey::Search(text.into())
    }

    /// Creates a location-reference key.
    pub fn location(location: LocationRef) -> Self {
        LookupKey::Location(location)
    }

    /// Normalizes search text: trimmed, inner whitespace collapsed, lowercase.
    pub fn normalize_search(text: &str) -> String {
        text.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// The value of the group's key column (`search_query` or `location_id`).
    pub fn store_key(&self) -> String {
        match self {
            LookupKey::Search(text) => Self::normalize_search(text),
            LookupKey::Location(loc) => loc.id.trim().to_string(),
        }
    }

    /// Returns the location reference, if any.
    pub fn location_ref(&self) -> Option<&LocationRef> {
        match self {
            LookupKey::Location(loc) => Some(loc),
            LookupKey::Search(_) => None,
        }
    }

    /// Checks that this key can address a group of `kind`.
    pub fn validate_for(&self, kind: ResourceKind) -> Result<()> {
        match (kind.is_location(), self) {
            (true, LookupKey::Search(text)) => {
                if text.trim().is_empty() {
                    return Err(ExplorerError::InvalidLookup("search text is empty".into()));
                }
                Ok(())
            }
            (false, LookupKey::Location(loc)) => {
                if loc.id.trim().is_empty() {
                    return Err(ExplorerError::InvalidLookup("location id is empty".into()));
                }
                if !loc.latitude.is_finite() || !loc.longitude.is_finite() {
                    return Err(ExplorerError::InvalidLookup(
                        "location coordinates must be finite".into(),
                    ));
                }
                // Event and movie searches are by text, not coordinates.
                let has_text = match kind {
                    ResourceKind::Event => loc.address().is_some(),
                    ResourceKind::Movie => loc.city().is_some(),
                    _ => true,
                };
                if !has_text {
                    return Err(ExplorerError::InvalidLookup(format!(
                        "{} search needs formatted_query or search_query",
                        kind
                    )));
                }
                Ok(())
            }
            (true, LookupKey::Location(_)) => Err(ExplorerError::InvalidLookup(
                "locations are looked up by search text".into(),
            )),
            (false, LookupKey::Search(_)) => Err(ExplorerError::InvalidLookup(format!(
                "{} is looked up by location reference",
                kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::types::Location;

    fn seattle() -> LocationRef {
        LocationRef::new("L1", 47.6062, -122.3321).with_formatted_query("Seattle, WA, USA")
    }

    #[test]
    fn test_search_key_normalized() {
        let key = LookupKey::search("  Seattle   WA ");
        assert_eq!(key.store_key(), "seattle wa");
    }

    #[test]
    fn test_location_key_is_id() {
        let key = LookupKey::location(seattle());
        assert_eq!(key.store_key(), "L1");
    }

    #[test]
    fn test_validate_matching_kinds() {
        assert!(LookupKey::search("Seattle").validate_for(ResourceKind::Location).is_ok());
        assert!(LookupKey::location(seattle()).validate_for(ResourceKind::Weather).is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatch() {
        let err = LookupKey::search("Seattle")
            .validate_for(ResourceKind::Weather)
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidLookup(_)));

        let err = LookupKey::location(seattle())
            .validate_for(ResourceKind::Location)
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidLookup(_)));
    }

    #[test]
    fn test_validate_rejects_blank_and_nan() {
        assert!(LookupKey::search("   ").validate_for(ResourceKind::Location).is_err());
        assert!(LookupKey::location(LocationRef::new("", 1.0, 1.0))
            .validate_for(ResourceKind::Trail)
            .is_err());
        assert!(LookupKey::location(LocationRef::new("L1", f64::NAN, 1.0))
            .validate_for(ResourceKind::Trail)
            .is_err());
    }

    #[test]
    fn test_text_searches_need_an_address() {
        let bare = LookupKey::location(LocationRef::new("L1", 47.6, -122.3));
        for kind in [ResourceKind::Event, ResourceKind::Movie] {
            let err = bare.validate_for(kind).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidLookup(_)), "{}", kind);
        }
        for kind in [ResourceKind::Weather, ResourceKind::Yelp, ResourceKind::Trail] {
            assert!(bare.validate_for(kind).is_ok(), "{}", kind);
        }

        let blank = LookupKey::location(LocationRef::new("L1", 47.6, -122.3).with_formatted_query("  "));
        assert!(blank.validate_for(ResourceKind::Event).is_err());
        assert!(LookupKey::location(seattle()).validate_for(ResourceKind::Event).is_ok());
        assert!(LookupKey::location(seattle()).validate_for(ResourceKind::Movie).is_ok());
    }

    #[test]
    fn test_city_from_formatted_query() {
        assert_eq!(seattle().city(), Some("Seattle"));
        assert_eq!(LocationRef::new("L1", 0.0, 0.0).city(), None);
    }

    #[test]
    fn test_from_record_requires_id() {
        let mut record = Record::new(
            RecordData::Location(Location {
                search_query: "seattle".into(),
                formatted_query: "Seattle, WA, USA".into(),
                latitude: 47.6,
                longitude: -122.3,
            }),
            Utc::now(),
        );
        assert!(LocationRef::from_record(&record).is_none());

        record.id = Some(7);
        let loc = LocationRef::from_record(&record).unwrap();
        assert_eq!(loc.id, "7");
        assert_eq!(loc.city(), Some("Seattle"));
    }
}
