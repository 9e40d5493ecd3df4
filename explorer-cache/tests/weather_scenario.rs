//! Weather group lifecycle against a real SQL store.
//!
//! t=0s miss → 7 daily records written; t=5s hit; t=21s stale → evicted,
//! refetched and rewritten with the new timestamp.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use explorer_cache::{CacheOrchestrator, ResolutionSource};
use explorer_core::error::Result;
use explorer_core::{
    Fetcher, LocationRef, LookupKey, ManualClock, RecordData, RecordStore, ResourceKind, Weather,
};
use explorer_store::SqlStore;

struct SevenDayForecast {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for SevenDayForecast {
    async fn fetch(&self, kind: ResourceKind, key: &LookupKey) -> Result<Vec<RecordData>> {
        assert_eq!(kind, ResourceKind::Weather);
        assert!(key.location_ref().is_some());

        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let start = DateTime::from_timestamp(1_792_306_800, 0).unwrap_or_default();
        Ok((0..7)
            .map(|d| {
                RecordData::Weather(Weather {
                    forecast: format!("forecast #{} for day {}", call, d),
                    time: (start + Duration::days(d)).format("%a %b %d %Y").to_string(),
                })
            })
            .collect())
    }
}

#[tokio::test]
async fn test_weather_group_lifecycle() {
    let t0: DateTime<Utc> = DateTime::from_timestamp(1_792_300_000, 0).unwrap();
    let clock = Arc::new(ManualClock::new(t0));
    let store = Arc::new(SqlStore::in_memory().await.unwrap());
    let fetcher = Arc::new(SevenDayForecast {
        calls: AtomicUsize::new(0),
    });
    let orchestrator =
        CacheOrchestrator::new(store.clone(), fetcher.clone()).with_clock(clock.clone());

    let key = LookupKey::location(
        LocationRef::new("42", 47.6062, -122.3321).with_formatted_query("Seattle, WA, USA"),
    );

    // t = 0: miss
    let first = orchestrator.resolve(ResourceKind::Weather, &key).await.unwrap();
    assert_eq!(first.source, ResolutionSource::Upstream);
    assert_eq!(first.records.len(), 7);
    assert!(first.records.iter().all(|r| r.created_at == t0));
    assert!(first.records.iter().all(|r| r.location_id.as_deref() == Some("42")));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    // t = 5s: hit, same rows
    clock.advance(Duration::seconds(5));
    let second = orchestrator.resolve(ResourceKind::Weather, &key).await.unwrap();
    assert_eq!(second.source, ResolutionSource::Cache);
    assert_eq!(second.records, first.records);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);

    // t = 21s: stale, evicted and refetched
    clock.advance(Duration::seconds(16));
    let third = orchestrator.resolve(ResourceKind::Weather, &key).await.unwrap();
    assert_eq!(third.source, ResolutionSource::Upstream);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(third
        .records
        .iter()
        .all(|r| r.created_at == t0 + Duration::seconds(21)));

    let stored = store.read(ResourceKind::Weather, "42").await.unwrap();
    assert_eq!(stored.len(), 7);
    let old_ids: Vec<_> = first.records.iter().map(|r| r.id).collect();
    assert!(stored.iter().all(|r| !old_ids.contains(&r.id)));
    assert!(stored.iter().all(|r| r.created_at == t0 + Duration::seconds(21)));

    let stats = orchestrator.stats();
    assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 2, 1));

    orchestrator.close().await.unwrap();
}
