//! Catalog loading: revision lookup, then zone list + popularity at that revision.
//!
//! Addressing both payloads by the exact revision keeps intermediate caches
//! from serving a zone list and a popularity map from different snapshots.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::protocol::{PopularityMap, RawZone, Zone};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("could not parse response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("revision list has no `{0}` entry")]
    MissingRevision(String),
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

/// Anything that can serve the three catalog payloads.
pub trait CatalogSource: Send + Sync {
    fn latest_revision(&self) -> impl Future<Output = Result<String, CatalogError>> + Send;

    fn fetch_zones(
        &self,
        rev: &str,
    ) -> impl Future<Output = Result<Vec<RawZone>, CatalogError>> + Send;

    fn fetch_popularity(
        &self,
        rev: &str,
    ) -> impl Future<Output = Result<PopularityMap, CatalogError>> + Send;
}

pub struct HttpCatalogSource {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpCatalogSource {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(CatalogError::Client)?;
        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|source| CatalogError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

impl CatalogSource for HttpCatalogSource {
    async fn latest_revision(&self) -> Result<String, CatalogError> {
        let entries: Vec<serde_json::Value> = self.get_json(&self.config.revision_url).await?;
        revision_from_entries(&entries, &self.config.revision_field)
    }

    async fn fetch_zones(&self, rev: &str) -> Result<Vec<RawZone>, CatalogError> {
        self.get_json(&self.config.zones_url_at(rev)).await
    }

    async fn fetch_popularity(&self, rev: &str) -> Result<PopularityMap, CatalogError> {
        self.get_json(&self.config.popularity_url_at(rev)).await
    }
}

/// Token from the first entry of a revision listing.
pub fn revision_from_entries(
    entries: &[serde_json::Value],
    field: &str,
) -> Result<String, CatalogError> {
    entries
        .first()
        .and_then(|entry| entry.get(field))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CatalogError::MissingRevision(field.to_string()))
}

/// Fetch a full snapshot. Any failure aborts; nothing partial is returned.
pub async fn load_catalog<S: CatalogSource>(source: &S) -> Result<Vec<Zone>, CatalogError> {
    let rev = source.latest_revision().await?;
    debug!("catalog revision {}", rev);

    let (raw, popularity) =
        tokio::try_join!(source.fetch_zones(&rev), source.fetch_popularity(&rev))?;

    let zones = merge_zones(raw, &popularity);
    info!("loaded {} zones at {}", zones.len(), rev);
    Ok(zones)
}

/// Back-fill popularity and tags, keeping the first record for any repeated id.
pub fn merge_zones(raw: Vec<RawZone>, popularity: &PopularityMap) -> Vec<Zone> {
    let mut seen = HashSet::new();
    let mut zones = Vec::with_capacity(raw.len());
    for record in raw {
        if !seen.insert(record.id.clone()) {
            warn!("duplicate zone id {} ignored", record.id);
            continue;
        }
        zones.push(record.into_zone(popularity));
    }

    let unordered = zones.iter().filter(|z| z.recency_key().is_none()).count();
    if unordered > 0 {
        warn!(
            "{} zones have neither an added field nor a numeric id; newest-first order is approximate",
            unordered
        );
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str, name: &str) -> RawZone {
        serde_json::from_value(json!({ "id": id, "name": name, "url": format!("https://z/{id}") }))
            .unwrap()
    }

    #[test]
    fn revision_comes_from_first_entry() {
        let entries = vec![json!({"sha": "abc"}), json!({"sha": "older"})];
        assert_eq!(revision_from_entries(&entries, "sha").unwrap(), "abc");
    }

    #[test]
    fn missing_revision_is_an_error() {
        assert!(matches!(
            revision_from_entries(&[], "sha"),
            Err(CatalogError::MissingRevision(_))
        ));
        assert!(matches!(
            revision_from_entries(&[json!({"id": 1})], "sha"),
            Err(CatalogError::MissingRevision(_))
        ));
    }

    #[test]
    fn merge_defaults_popularity_and_drops_duplicates() {
        let mut pop = PopularityMap::new();
        pop.insert("1".to_string(), 1200);
        let zones = merge_zones(vec![raw("1", "One"), raw("2", "Two"), raw("1", "Again")], &pop);
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].name, "One");
        assert_eq!(zones[0].popularity, 1200);
        assert_eq!(zones[1].popularity, 0);
        assert!(zones[1].tags.is_empty());
    }
}
