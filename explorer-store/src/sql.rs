//! libSQL record store.
//!
//! One table per resource kind, laid out by [`crate::schema`]. A local path
//! (or `:memory:`) opens an embedded database; a `libsql://`, `http://` or
//! `https://` URL connects to a remote Turso/sqld instance.

use std::collections::HashMap;

use async_trait::async_trait;
use libsql::params::Params;
use libsql::{Builder, Connection, Database, Value};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use explorer_core::error::{ExplorerError, Result};
use explorer_core::traits::RecordStore;
use explorer_core::types::{validate_group, Record, ResourceKind};

use crate::codec;
use crate::schema::{schema_for, validate_schemas, TableSchema, SCHEMAS};

/// Where the SQL store lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// File path, `:memory:`, or remote URL
    pub url: String,
    /// Auth token for remote databases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl StoreConfig {
    /// Local database file.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            url: path.into(),
            auth_token: None,
        }
    }

    /// Private in-process database, discarded on close.
    pub fn in_memory() -> Self {
        Self::local(":memory:")
    }

    /// Remote database with an auth token.
    pub fn remote(url: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth_token: Some(auth_token.into()),
        }
    }

    /// True when `url` names a remote server.
    pub fn is_remote(&self) -> bool {
        ["libsql://", "http://", "https://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::local("explorer.db")
    }
}

/// Pre-rendered statements for one table.
#[derive(Debug)]
struct Statements {
    select: String,
    insert: String,
    delete: String,
}

impl Statements {
    fn for_schema(schema: &TableSchema) -> Self {
        Self {
            select: schema.select_sql(),
            insert: schema.insert_sql(),
            delete: schema.delete_sql(),
        }
    }
}

struct Handle {
    // The database must outlive its connection.
    _db: Database,
    conn: Connection,
}

/// Durable [`RecordStore`] on libSQL.
///
/// Operations share one connection behind an async mutex. A group write
/// runs in a single transaction and is rolled back on any failure.
pub struct SqlStore {
    handle: Mutex<Option<Handle>>,
    statements: HashMap<ResourceKind, Statements>,
    url: String,
}

impl std::fmt::Debug for SqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlStore").field("url", &self.url).finish()
    }
}

impl SqlStore {
    /// Opens the database and creates any missing tables.
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        validate_schemas()?;

        let db = if config.is_remote() {
            let token = config.auth_token.clone().unwrap_or_default();
            Builder::new_remote(config.url.clone(), token)
                .build()
                .await
                .map_err(|e| classify("open remote database", e))?
        } else {
            Builder::new_local(config.url.as_str())
                .build()
                .await
                .map_err(|e| classify("open local database", e))?
        };
        let conn = db.connect().map_err(|e| classify("connect", e))?;

        for schema in SCHEMAS.iter() {
            for statement in schema.ddl() {
                conn.execute(&statement, Params::None)
                    .await
                    .map_err(|e| classify(&format!("create {}", schema.table), e))?;
            }
        }

        let statements = ResourceKind::ALL
            .into_iter()
            .map(|kind| (kind, Statements::for_schema(schema_for(kind))))
            .collect();

        info!(tables = SCHEMAS.len(), "SQL store ready");

        Ok(Self {
            handle: Mutex::new(Some(Handle { _db: db, conn })),
            statements,
            url: config.url.clone(),
        })
    }

    /// Opens a private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        Self::open(&StoreConfig::in_memory()).await
    }

    fn statements(&self, kind: ResourceKind) -> Result<&Statements> {
        self.statements.get(&kind).ok_or_else(|| {
            ExplorerError::InternalError(format!("no statements prepared for {}", kind))
        })
    }
}

/// Maps a libSQL error onto the store taxonomy.
fn classify(context: &str, err: libsql::Error) -> ExplorerError {
    let msg = err.to_string();
    if msg.to_ascii_lowercase().contains("constraint") {
        ExplorerError::ConstraintViolation(format!("{}: {}", context, msg))
    } else {
        ExplorerError::StoreUnavailable(format!("{}: {}", context, msg))
    }
}

fn closed() -> ExplorerError {
    ExplorerError::StoreUnavailable("store is closed".into())
}

async fn insert_rows(conn: &Connection, sql: &str, rows: Vec<Vec<Value>>) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(rows.len());
    for values in rows {
        conn.execute(sql, Params::Positional(values))
            .await
            .map_err(|e| classify("insert", e))?;
        ids.push(conn.last_insert_rowid());
    }
    Ok(ids)
}

#[async_trait]
impl RecordStore for SqlStore {
    #[instrument(skip(self))]
    async fn read(&self, kind: ResourceKind, key: &str) -> Result<Vec<Record>> {
        let schema = schema_for(kind);
        let sql = &self.statements(kind)?.select;

        let guard = self.handle.lock().await;
        let handle = guard.as_ref().ok_or_else(closed)?;

        let mut rows = handle
            .conn
            .query(sql, Params::Positional(vec![Value::Text(key.to_string())]))
            .await
            .map_err(|e| classify("select", e))?;

        let width = schema.select_columns().len() as i32;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await.map_err(|e| classify("select", e))? {
            let mut values = Vec::with_capacity(width as usize);
            for i in 0..width {
                values.push(row.get_value(i).map_err(|e| classify("select", e))?);
            }
            records.push(codec::decode(schema, values)?);
        }

        debug!(%kind, key, count = records.len(), "Read group");
        Ok(records)
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn write(&self, kind: ResourceKind, records: &[Record]) -> Result<Vec<i64>> {
        validate_group(kind, records)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let schema = schema_for(kind);
        let rows = records
            .iter()
            .map(|r| codec::encode(schema, r))
            .collect::<Result<Vec<_>>>()?;
        let sql = &self.statements(kind)?.insert;

        let guard = self.handle.lock().await;
        let handle = guard.as_ref().ok_or_else(closed)?;

        let tx = handle
            .conn
            .transaction()
            .await
            .map_err(|e| classify("begin", e))?;

        match insert_rows(&tx, sql, rows).await {
            Ok(ids) => {
                tx.commit().await.map_err(|e| classify("commit", e))?;
                debug!(%kind, count = ids.len(), "Wrote group");
                Ok(ids)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!(%kind, error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, kind: ResourceKind, key: &str) -> Result<u64> {
        let sql = &self.statements(kind)?.delete;

        let guard = self.handle.lock().await;
        let handle = guard.as_ref().ok_or_else(closed)?;

        let removed = handle
            .conn
            .execute(sql, Params::Positional(vec![Value::Text(key.to_string())]))
            .await
            .map_err(|e| classify("delete", e))?;

        debug!(%kind, key, removed, "Deleted group");
        Ok(removed)
    }

    async fn close(&self) -> Result<()> {
        if self.handle.lock().await.take().is_some() {
            info!(url = %self.url, "SQL store closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use explorer_core::types::{
        Event, Location, Movie, RecordData, Trail, Weather, YelpBusiness,
    };

    fn sample(kind: ResourceKind) -> RecordData {
        match kind {
            ResourceKind::Location => RecordData::Location(Location {
                search_query: "seattle".into(),
                formatted_query: "Seattle, WA, USA".into(),
                latitude: 47.6062095,
                longitude: -122.3320708,
            }),
            ResourceKind::Weather => RecordData::Weather(Weather {
                forecast: "Light rain in the morning.".into(),
                time: "Mon Oct 19 2026".into(),
            }),
            ResourceKind::Event => RecordData::Event(Event {
                link: "https://www.eventbrite.com/e/123".into(),
                name: "Harbor Lights".into(),
                event_date: "Sat Oct 24 2026".into(),
                summary: None,
            }),
            ResourceKind::Movie => RecordData::Movie(Movie {
                title: "Sleepless in Seattle".into(),
                overview: Some("A widowed architect...".into()),
                average_votes: 6.7,
                total_votes: 2451,
                image_url: None,
                popularity: 12.5,
                released_on: Some("1993-06-24".into()),
            }),
            ResourceKind::Trail => RecordData::Trail(Trail {
                name: "Discovery Park Loop".into(),
                location: Some("Seattle, Washington".into()),
                length: 2.8,
                stars: 4.5,
                star_votes: 61,
                summary: Some("Bluffs and beach".into()),
                trail_url: "https://www.hikingproject.com/trail/1".into(),
                conditions: None,
                condition_date: Some("2026-10-17".into()),
                condition_time: Some("08:15:00".into()),
            }),
            ResourceKind::Yelp => RecordData::Yelp(YelpBusiness {
                name: "Pike Place Chowder".into(),
                image_url: Some("https://s3-media.yelp.com/1.jpg".into()),
                price: Some("$$".into()),
                rating: 4.5,
                url: "https://www.yelp.com/biz/pike-place-chowder".into(),
            }),
        }
    }

    fn record(kind: ResourceKind) -> Record {
        let r = Record::new(sample(kind), Utc::now());
        if kind.is_location() {
            r
        } else {
            r.with_location_id("L1")
        }
    }

    fn key(kind: ResourceKind) -> &'static str {
        if kind.is_location() {
            "seattle"
        } else {
            "L1"
        }
    }

    #[tokio::test]
    async fn test_round_trip_every_kind() {
        let store = SqlStore::in_memory().await.unwrap();

        for kind in ResourceKind::ALL {
            let original = record(kind);
            let ids = store.write(kind, &[original.clone()]).await.unwrap();
            assert_eq!(ids.len(), 1);

            let read = store.read(kind, key(kind)).await.unwrap();
            assert_eq!(read.len(), 1, "{}", kind);
            assert_eq!(read[0].id, Some(ids[0]));
            assert_eq!(read[0].data, original.data, "{}", kind);
            assert_eq!(read[0].location_id, original.location_id);
            assert_eq!(read[0].created_at, original.created_at);
        }
    }

    #[tokio::test]
    async fn test_group_order_and_delete() {
        let store = SqlStore::in_memory().await.unwrap();
        let start = Utc::now();
        let group: Vec<Record> = (0..7)
            .map(|d| {
                Record::new(
                    RecordData::Weather(Weather {
                        forecast: format!("forecast {}", d),
                        time: (start + Duration::days(d)).format("%a %b %d %Y").to_string(),
                    }),
                    start,
                )
                .with_location_id("42")
            })
            .collect();

        let ids = store.write(ResourceKind::Weather, &group).await.unwrap();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let read = store.read(ResourceKind::Weather, "42").await.unwrap();
        let forecasts: Vec<_> = read.iter().map(|r| r.data.clone()).collect();
        let expected: Vec<_> = group.iter().map(|r| r.data.clone()).collect();
        assert_eq!(forecasts, expected);

        assert_eq!(store.delete(ResourceKind::Weather, "42").await.unwrap(), 7);
        assert_eq!(store.delete(ResourceKind::Weather, "42").await.unwrap(), 0);
        assert!(store.read(ResourceKind::Weather, "42").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mixed_group_rejected() {
        let store = SqlStore::in_memory().await.unwrap();
        let group = vec![
            record(ResourceKind::Yelp),
            Record::new(sample(ResourceKind::Yelp), Utc::now()).with_location_id("L2"),
        ];

        let err = store.write(ResourceKind::Yelp, &group).await.unwrap_err();
        assert!(matches!(err, ExplorerError::ConstraintViolation(_)));
        assert!(store.read(ResourceKind::Yelp, "L1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_row_rolls_back_group() {
        let store = SqlStore::in_memory().await.unwrap();
        let business = |rating: f64| {
            let mut r = record(ResourceKind::Yelp);
            if let RecordData::Yelp(biz) = &mut r.data {
                biz.rating = rating;
            }
            r
        };

        // NaN binds as NULL and trips the NOT NULL rating column on row two.
        let err = store
            .write(ResourceKind::Yelp, &[business(4.0), business(f64::NAN)])
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::ConstraintViolation(_)));
        assert!(store.read(ResourceKind::Yelp, "L1").await.unwrap().is_empty());

        let ids = store.write(ResourceKind::Yelp, &[business(4.0)]).await.unwrap();
        assert_eq!(ids.len(), 1);
        assert_eq!(store.read(ResourceKind::Yelp, "L1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_unavailable() {
        let store = SqlStore::in_memory().await.unwrap();
        store.close().await.unwrap();
        store.close().await.unwrap();

        let err = store.read(ResourceKind::Movie, "L1").await.unwrap_err();
        assert!(matches!(err, ExplorerError::StoreUnavailable(_)));
        let err = store
            .write(ResourceKind::Movie, &[record(ResourceKind::Movie)])
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("explorer.db");
        let config = StoreConfig::local(path.to_string_lossy().to_string());

        let original = record(ResourceKind::Location);
        {
            let store = SqlStore::open(&config).await.unwrap();
            store.write(ResourceKind::Location, &[original.clone()]).await.unwrap();
            store.close().await.unwrap();
        }

        let store = SqlStore::open(&config).await.unwrap();
        let read = store.read(ResourceKind::Location, "seattle").await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].data, original.data);
        assert_eq!(read[0].created_at, original.created_at);
    }

    #[test]
    fn test_config_remote_detection() {
        assert!(StoreConfig::remote("libsql://explorer.turso.io", "t").is_remote());
        assert!(!StoreConfig::local("https-cache.db").is_remote());
        assert!(!StoreConfig::in_memory().is_remote());
    }

    #[test]
    fn test_classify() {
        let err = classify(
            "insert",
            libsql::Error::SqliteFailure(19, "NOT NULL constraint failed: weathers.time".into()),
        );
        assert!(matches!(err, ExplorerError::ConstraintViolation(_)));

        let err = classify("select", libsql::Error::ConnectionFailed("refused".into()));
        assert!(matches!(err, ExplorerError::StoreUnavailable(_)));
    }
}
