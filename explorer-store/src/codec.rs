//! Record ⇄ row conversion.
//!
//! Field order here must match the column order in [`crate::schema`].

use chrono::DateTime;
use libsql::Value;

use explorer_core::error::{ExplorerError, Result};
use explorer_core::types::{
    Event, Location, Movie, Record, RecordData, ResourceKind, Trail, Weather, YelpBusiness,
};

use crate::schema::TableSchema;

/// Encodes a record in INSERT column order.
pub(crate) fn encode(schema: &TableSchema, record: &Record) -> Result<Vec<Value>> {
    let mut values = match &record.data {
        RecordData::Location(l) => vec![
            text(&l.search_query),
            text(&l.formatted_query),
            Value::Real(l.latitude),
            Value::Real(l.longitude),
        ],
        RecordData::Weather(w) => vec![text(&w.forecast), text(&w.time)],
        RecordData::Event(e) => vec![
            text(&e.link),
            text(&e.name),
            text(&e.event_date),
            opt_text(&e.summary),
        ],
        RecordData::Movie(m) => vec![
            text(&m.title),
            opt_text(&m.overview),
            Value::Real(m.average_votes),
            Value::Integer(m.total_votes),
            opt_text(&m.image_url),
            Value::Real(m.popularity),
            opt_text(&m.released_on),
        ],
        RecordData::Trail(t) => vec![
            text(&t.name),
            opt_text(&t.location),
            Value::Real(t.length),
            Value::Real(t.stars),
            Value::Integer(t.star_votes),
            opt_text(&t.summary),
            text(&t.trail_url),
            opt_text(&t.conditions),
            opt_text(&t.condition_date),
            opt_text(&t.condition_time),
        ],
        RecordData::Yelp(y) => vec![
            text(&y.name),
            opt_text(&y.image_url),
            opt_text(&y.price),
            Value::Real(y.rating),
            text(&y.url),
        ],
    };

    if values.len() != schema.columns.len() {
        return Err(ExplorerError::ConstraintViolation(format!(
            "{} record encodes {} fields, table {} has {}",
            schema.kind,
            values.len(),
            schema.table,
            schema.columns.len()
        )));
    }

    if !schema.keyed_by_field() {
        let location_id = record.location_id.as_deref().ok_or_else(|| {
            ExplorerError::ConstraintViolation(format!("{} record has no location_id", schema.kind))
        })?;
        values.push(text(location_id));
    }
    values.push(Value::Integer(record.created_at.timestamp_millis()));

    Ok(values)
}

/// Decodes a row read with [`TableSchema::select_columns`] order.
pub(crate) fn decode(schema: &TableSchema, values: Vec<Value>) -> Result<Record> {
    let expected = schema.select_columns().len();
    if values.len() != expected {
        return Err(ExplorerError::ConstraintViolation(format!(
            "{} row has {} columns, expected {}",
            schema.table,
            values.len(),
            expected
        )));
    }

    let mut cols = Cells {
        table: schema.table,
        values: values.into_iter(),
    };

    let id = cols.integer()?;
    let data = match schema.kind {
        ResourceKind::Location => RecordData::Location(Location {
            search_query: cols.text()?,
            formatted_query: cols.text()?,
            latitude: cols.real()?,
            longitude: cols.real()?,
        }),
        ResourceKind::Weather => RecordData::Weather(Weather {
            forecast: cols.text()?,
            time: cols.text()?,
        }),
        ResourceKind::Event => RecordData::Event(Event {
            link: cols.text()?,
            name: cols.text()?,
            event_date: cols.text()?,
            summary: cols.opt_text()?,
        }),
        ResourceKind::Movie => RecordData::Movie(Movie {
            title: cols.text()?,
            overview: cols.opt_text()?,
            average_votes: cols.real()?,
            total_votes: cols.integer()?,
            image_url: cols.opt_text()?,
            popularity: cols.real()?,
            released_on: cols.opt_text()?,
        }),
        ResourceKind::Trail => RecordData::Trail(Trail {
            name: cols.text()?,
            location: cols.opt_text()?,
            length: cols.real()?,
            stars: cols.real()?,
            star_votes: cols.integer()?,
            summary: cols.opt_text()?,
            trail_url: cols.text()?,
            conditions: cols.opt_text()?,
            condition_date: cols.opt_text()?,
            condition_time: cols.opt_text()?,
        }),
        ResourceKind::Yelp => RecordData::Yelp(YelpBusiness {
            name: cols.text()?,
            image_url: cols.opt_text()?,
            price: cols.opt_text()?,
            rating: cols.real()?,
            url: cols.text()?,
        }),
    };

    let location_id = if schema.keyed_by_field() {
        None
    } else {
        Some(cols.text()?)
    };

    let millis = cols.integer()?;
    let created_at = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        ExplorerError::ConstraintViolation(format!(
            "{}: created_at {} out of range",
            schema.table, millis
        ))
    })?;

    Ok(Record {
        id: Some(id),
        location_id,
        created_at,
        data,
    })
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

fn opt_text(s: &Option<String>) -> Value {
    match s {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

/// Sequential typed access to a row's values.
struct Cells {
    table: &'static str,
    values: std::vec::IntoIter<Value>,
}

impl Cells {
    fn next(&mut self) -> Result<Value> {
        self.values.next().ok_or_else(|| {
            ExplorerError::ConstraintViolation(format!("{}: row ended early", self.table))
        })
    }

    fn mismatch(&self, expected: &str, got: &Value) -> ExplorerError {
        ExplorerError::ConstraintViolation(format!(
            "{}: expected {}, found {:?}",
            self.table, expected, got
        ))
    }

    fn text(&mut self) -> Result<String> {
        match self.next()? {
            Value::Text(s) => Ok(s),
            other => Err(self.mismatch("TEXT", &other)),
        }
    }

    fn opt_text(&mut self) -> Result<Option<String>> {
        match self.next()? {
            Value::Text(s) => Ok(Some(s)),
            Value::Null => Ok(None),
            other => Err(self.mismatch("TEXT or NULL", &other)),
        }
    }

    fn real(&mut self) -> Result<f64> {
        match self.next()? {
            Value::Real(f) => Ok(f),
            // REAL affinity stores integral values as INTEGER on the wire
            Value::Integer(i) => Ok(i as f64),
            other => Err(self.mismatch("REAL", &other)),
        }
    }

    fn integer(&mut self) -> Result<i64> {
        match self.next()? {
            Value::Integer(i) => Ok(i),
            other => Err(self.mismatch("INTEGER", &other)),
        }
    }
}
