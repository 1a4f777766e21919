//! Integration Tests for the client operations
//!
//! Covers cache consultation, transport selection, and uncached operations
//! against a WireMock upstream.

mod common;

use neon_gateway::models::{DataQuery, LocationOptions, SampleQuery, SiteSelector, TaxonomyQuery};
use neon_gateway::client::HierarchyLimits;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, envelope, location};

#[tokio::test]
async fn test_repeated_call_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sites/SRER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "siteCode": "SRER",
            "siteName": "Santa Rita Experimental Range"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.get_site("SRER").await.unwrap();
    let second = client.get_site("SRER").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.site_name.as_deref(), Some("Santa Rita Experimental Range"));

    let stats = client.cache_stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_failed_call_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/DP1.99999.001"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "no such product", "status": 404})))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.get_product("DP1.99999.001").await.unwrap_err().is_not_found());
    assert!(client.get_product("DP1.99999.001").await.unwrap_err().is_not_found());
    assert!(client.cache().read().await.is_empty());
}

#[tokio::test]
async fn test_single_site_query_uses_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/query"))
        .and(query_param("productCode", "DP1.00001.001"))
        .and(query_param("siteCode", "SRER"))
        .and(query_param("startDateMonth", "2023-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"siteCodes": []}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = DataQuery::for_sites("DP1.00001.001", vec!["SRER".into()]).months("2023-01", "2023-03");

    client.query_data(&query).await.unwrap();
    // Second call answered from cache
    client.query_data(&query).await.unwrap();
}

#[tokio::test]
async fn test_multi_site_query_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/data/query"))
        .and(body_json(json!({
            "productCode": "DP1.00001.001",
            "siteCodes": ["SRER"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({"siteCodes": ["SRER"]}))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = DataQuery::new("DP1.00001.001", SiteSelector::Multiple(vec!["SRER".into()]));

    let data = client.query_data(&query).await.unwrap();
    assert_eq!(data["siteCodes"], json!(["SRER"]));
}

#[tokio::test]
async fn test_sample_lookup_never_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/samples/view"))
        .and(query_param("barcode", "A00000123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "sampleViews": [{"sampleUuid": "u-1", "barcode": "A00000123"}]
        }))))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = SampleQuery {
        barcode: Some("A00000123".into()),
        ..Default::default()
    };

    let sample = client.track_sample(&query).await.unwrap();
    client.track_sample(&query).await.unwrap();

    assert_eq!(sample.sample_views[0].sample_uuid.as_deref(), Some("u-1"));
    assert!(client.cache().read().await.is_empty());
}

#[tokio::test]
async fn test_taxonomy_search_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/taxonomy"))
        .and(query_param("taxonTypeCode", "BIRD"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"taxonID": "AMRO", "scientificName": "Turdus migratorius"},
            {"taxonID": "BLJA", "scientificName": "Cyanocitta cristata"}
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let query = TaxonomyQuery {
        taxon_type_code: Some("BIRD".into()),
        limit: Some(2),
        ..Default::default()
    };

    let entries = client.search_taxonomy(&query).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].taxon_id.as_deref(), Some("AMRO"));
}

#[tokio::test]
async fn test_releases() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/releases/RELEASE-2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "release": "RELEASE-2024",
            "generationDate": "2024-01-26T00:00:00Z"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let release = client_for(&server).get_release("RELEASE-2024").await.unwrap();
    assert_eq!(release.release, "RELEASE-2024");
    assert!(release.generation_date.is_some());
}

#[tokio::test]
async fn test_download_resolution_uses_head_and_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/files/NEON.D14.SRER.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-length", "4096")
                .insert_header("etag", "\"d41d8cd9\"")
                .insert_header("content-type", "text/csv"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let url = format!("{}/files/NEON.D14.SRER.csv", server.uri());

    let descriptor = client.resolve_download(&url).await.unwrap();
    client.resolve_download(&url).await.unwrap();

    assert_eq!(descriptor.url, url);
    assert_eq!(descriptor.size, Some(4096));
    assert_eq!(descriptor.checksum.as_deref(), Some("d41d8cd9"));
    assert_eq!(descriptor.content_type.as_deref(), Some("text/csv"));
}

#[tokio::test]
async fn test_expired_download_url_is_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/files/expired.csv"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/files/expired.csv", server.uri());
    let err = client_for(&server).resolve_download(&url).await.unwrap_err();
    assert!(matches!(err, neon_gateway::NeonError::Client { status: 403, .. }));
}

#[tokio::test]
async fn test_location_options_sent_as_flags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/locations/SRER"))
        .and(query_param("history", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(location("SRER", "SRER", Some("SITE"), None))))
        .expect(1)
        .mount(&server)
        .await;

    let options = LocationOptions {
        hierarchy: false,
        history: true,
    };
    let location = client_for(&server).get_location("SRER", options).await.unwrap();
    assert_eq!(location.location_name, "SRER");
}

#[tokio::test]
async fn test_hierarchy_walk_respects_child_cap() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/SRER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "locationName": "SRER",
            "siteCode": "SRER",
            "locationChildren": ["C1", "C2", "C3"]
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations/C1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "locationName": "C1",
            "siteCode": "SRER",
            "locationChildren": ["C1.1"]
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations/C2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations/C3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations/C1.1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).with_limits(HierarchyLimits {
        child_cap: 2,
        depth_cap: 1,
    });

    // Requested depth is clamped to the cap of 1
    let tree = client.expand_location("SRER", 5).await.unwrap();

    assert!(tree.truncated);
    assert_eq!(tree.children.len(), 1, "missing child is skipped");
    assert_eq!(tree.children[0].location.location_name, "C1");
    assert!(tree.children[0].children.is_empty());
    assert!(!tree.children[0].truncated);
}

#[tokio::test]
async fn test_path_arguments_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(location("A/B 1", "SRER", None, None))))
        .expect(1)
        .mount(&server)
        .await;

    let location = client_for(&server)
        .get_location("A/B 1", LocationOptions::default())
        .await
        .unwrap();
    assert_eq!(location.location_name, "A/B 1");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received[0].url.path(), "/locations/A%2FB%201");
}
