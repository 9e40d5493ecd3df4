//! Normalized records.
//!
//! Every provider payload is reduced to one of the per-kind structs below and
//! wrapped in a [`Record`] that carries the group key, the store identifier
//! and the write timestamp.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::types::ResourceKind;

/// A geocoded search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Normalized search text (the group key)
    pub search_query: String,
    /// Provider's formatted address
    pub formatted_query: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// One day of forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Forecast summary
    pub forecast: String,
    /// Day label, e.g. `Mon Oct 19 2026`
    pub time: String,
}

/// A local event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event page URL
    pub link: String,
    /// Event name
    pub name: String,
    /// Day label of the start date
    pub event_date: String,
    /// Short description
    pub summary: Option<String>,
}

/// A movie.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Original title
    pub title: String,
    /// Plot overview
    pub overview: Option<String>,
    /// Average vote
    pub average_votes: f64,
    /// Number of votes
    pub total_votes: i64,
    /// Poster URL
    pub image_url: Option<String>,
    /// Provider popularity score
    pub popularity: f64,
    /// Release date as reported by the provider
    pub released_on: Option<String>,
}

/// A business.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YelpBusiness {
    /// Business name
    pub name: String,
    /// Photo URL
    pub image_url: Option<String>,
    /// Price bracket (`$`..`$$$$`)
    pub price: Option<String>,
    /// Rating (0–5)
    pub rating: f64,
    /// Business page URL
    pub url: String,
}

/// A hiking trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    /// Trail name
    pub name: String,
    /// Area description
    pub location: Option<String>,
    /// Length in miles
    pub length: f64,
    /// Star rating
    pub stars: f64,
    /// Number of star votes
    pub star_votes: i64,
    /// Short description
    pub summary: Option<String>,
    /// Trail page URL
    pub trail_url: String,
    /// Condition status
    pub conditions: Option<String>,
    /// Date of the condition report
    pub condition_date: Option<String>,
    /// Time of the condition report
    pub condition_time: Option<String>,
}

/// Kind-specific fields of a record.
///
/// Serialized untagged so a record renders as one flat JSON object.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordData {
    /// Location fields
    Location(Location),
    /// Weather fields
    Weather(Weather),
    /// Event fields
    Event(Event),
    /// Movie fields
    Movie(Movie),
    /// Trail fields
    Trail(Trail),
    /// Business fields
    Yelp(YelpBusiness),
}

impl RecordData {
    /// The kind these fields belong to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            RecordData::Location(_) => ResourceKind::Location,
            RecordData::Weather(_) => ResourceKind::Weather,
            RecordData::Event(_) => ResourceKind::Event,
            RecordData::Movie(_) => ResourceKind::Movie,
            RecordData::Trail(_) => ResourceKind::Trail,
            RecordData::Yelp(_) => ResourceKind::Yelp,
        }
    }
}

/// One normalized unit of upstream data.
///
/// Immutable once written: invalidation deletes the whole group and
/// fetches it again.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    /// Identifier assigned by the store on write
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning location (absent for the location kind)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Write time; only used for expiry
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Kind-specific fields
    #[serde(flatten)]
    pub data: RecordData,
}

impl Record {
    /// Creates an unsaved record.
    ///
    /// `created_at` is truncated to milliseconds, the precision the store keeps.
    pub fn new(data: RecordData, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            location_id: None,
            created_at: created_at.trunc_subsecs(3),
            data,
        }
    }

    /// Sets the owning location.
    pub fn with_location_id(mut self, location_id: impl Into<String>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    /// The kind of this record.
    pub fn kind(&self) -> ResourceKind {
        self.data.kind()
    }

    /// Value of the group's key column.
    pub fn group_key(&self) -> Option<&str> {
        match &self.data {
            RecordData::Location(loc) => Some(loc.search_query.as_str()),
            _ => self.location_id.as_deref(),
        }
    }
}

/// Checks that `records` form one well-formed group of `kind`.
///
/// Every record must be of `kind`, carry its group key, and share that key
/// with the rest of the group.
pub fn validate_group(kind: ResourceKind, records: &[Record]) -> Result<()> {
    let mut group_key: Option<&str> = None;

    for (i, record) in records.iter().enumerate() {
        if record.kind() != kind {
            return Err(ExplorerError::ConstraintViolation(format!(
                "record {} is a {} record, expected {}",
                i,
                record.kind(),
                kind
            )));
        }

        let key = match record.group_key() {
            Some(k) if !k.is_empty() => k,
            _ => {
                return Err(ExplorerError::ConstraintViolation(format!(
                    "record {} of kind {} has no group key",
                    i, kind
                )))
            }
        };

        if kind.is_location() && record.location_id.is_some() {
            return Err(ExplorerError::ConstraintViolation(
                "location records cannot carry a location_id".into(),
            ));
        }

        match group_key {
            None => group_key = Some(key),
            Some(expected) if expected != key => {
                return Err(ExplorerError::ConstraintViolation(format!(
                    "group mixes keys '{}' and '{}'",
                    expected, key
                )))
            }
            Some(_) => {}
        }
    }

    Ok(())
}
