//! `HttpCatalogSource` against a loopback axum server.

mod common;

use axum::{http::StatusCode, routing::get, Json, Router};
use common::{sample_popularity, sample_zones};
use serde_json::json;
use zone_proto::catalog::{load_catalog, CatalogError, CatalogSource, HttpCatalogSource};
use zone_proto::config::CatalogConfig;

async fn serve_catalog() -> String {
    let app = Router::new()
        .route("/revisions", get(|| async { Json(json!([{ "sha": "abc123" }])) }))
        .route("/empty-revisions", get(|| async { Json(json!([])) }))
        .route("/abc123/zones.json", get(|| async { Json(sample_zones()) }))
        .route(
            "/abc123/popularity.json",
            get(|| async { Json(sample_popularity()) }),
        )
        .route("/abc123/garbled.json", get(|| async { "<html>not json</html>" }))
        .route(
            "/abc123/unavailable.json",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn source(base: &str, revisions: &str, zones: &str, popularity: &str) -> HttpCatalogSource {
    HttpCatalogSource::new(CatalogConfig {
        revision_url: format!("{}/{}", base, revisions),
        zones_url: format!("{}/{{rev}}/{}", base, zones),
        popularity_url: format!("{}/{{rev}}/{}", base, popularity),
        ..CatalogConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn loads_both_payloads_at_the_listed_revision() {
    let base = serve_catalog().await;
    let src = source(&base, "revisions", "zones.json", "popularity.json");

    assert_eq!(src.latest_revision().await.unwrap(), "abc123");
    let zones = load_catalog(&src).await.unwrap();
    assert_eq!(zones.len(), 3);
    assert_eq!(zones[1].name, "Beta");
    assert_eq!(zones[1].popularity, 10);
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let base = serve_catalog().await;
    let src = source(&base, "revisions", "zones.json", "unavailable.json");

    match load_catalog(&src).await {
        Err(CatalogError::Status { url, status }) => {
            assert_eq!(status, 503);
            assert!(url.ends_with("/abc123/unavailable.json"), "{}", url);
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn undecodable_body_maps_to_parse_error() {
    let base = serve_catalog().await;
    let src = source(&base, "revisions", "garbled.json", "popularity.json");

    match load_catalog(&src).await {
        Err(CatalogError::Parse { url, .. }) => {
            assert!(url.ends_with("/abc123/garbled.json"), "{}", url)
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_revision_list_is_reported() {
    let base = serve_catalog().await;
    let src = source(&base, "empty-revisions", "zones.json", "popularity.json");

    assert!(matches!(
        src.latest_revision().await,
        Err(CatalogError::MissingRevision(field)) if field == "sha"
    ));
}
