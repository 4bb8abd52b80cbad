//! Scripted catalog source and fixed clock shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use zone_proto::access::Clock;
use zone_proto::catalog::{CatalogError, CatalogSource};
use zone_proto::protocol::{PopularityMap, RawZone};

pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Serves canned payloads and counts every call.
#[derive(Default)]
pub struct ScriptedSource {
    pub revision: Option<String>,
    pub zones: serde_json::Value,
    pub popularity: serde_json::Value,
    /// When set, the popularity fetch answers with this HTTP status instead.
    pub popularity_status: Option<u16>,
    pub calls: Arc<AtomicUsize>,
    pub requested_revs: std::sync::Mutex<Vec<String>>,
}

impl ScriptedSource {
    pub fn new(zones: serde_json::Value, popularity: serde_json::Value) -> Self {
        Self {
            revision: Some("rev-1".to_string()),
            zones,
            popularity,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CatalogSource for ScriptedSource {
    async fn latest_revision(&self) -> Result<String, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        zone_proto::catalog::revision_from_entries(
            &self
                .revision
                .iter()
                .map(|r| json!({ "sha": r }))
                .collect::<Vec<_>>(),
            "sha",
        )
    }

    async fn fetch_zones(&self, rev: &str) -> Result<Vec<RawZone>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_revs.lock().unwrap().push(rev.to_string());
        Ok(serde_json::from_value(self.zones.clone()).expect("fixture zones"))
    }

    async fn fetch_popularity(&self, rev: &str) -> Result<PopularityMap, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_revs.lock().unwrap().push(rev.to_string());
        if let Some(status) = self.popularity_status {
            return Err(CatalogError::Status {
                url: format!("scripted://{}/popularity.json", rev),
                status,
            });
        }
        Ok(serde_json::from_value(self.popularity.clone()).expect("fixture popularity"))
    }
}

pub fn sample_zones() -> serde_json::Value {
    json!([
        { "id": 1, "name": "Alpha", "author": "Ana", "url": "https://z/1", "tags": ["x"] },
        { "id": 2, "name": "Beta", "url": "https://z/2", "image": "https://img/2.png", "tags": ["y"] },
        { "id": 3, "name": "Gamma", "authorUrl": "https://g.dev", "url": "https://z/3" }
    ])
}

pub fn sample_popularity() -> serde_json::Value {
    json!({ "1": 5, "2": 10 })
}
