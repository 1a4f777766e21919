//! Shared helpers for integration tests

#![allow(dead_code)]

use std::time::Duration;

use neon_gateway::cache::ResponseCache;
use neon_gateway::client::{RequestExecutor, RetryPolicy};
use neon_gateway::{Config, NeonClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_BACKOFF_MS: u64 = 10;

pub fn retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(TEST_BACKOFF_MS),
    }
}

pub fn client_for(server: &MockServer) -> NeonClient {
    let executor = RequestExecutor::new(server.uri(), Duration::from_secs(5), retry_policy())
        .expect("Failed to build executor");
    NeonClient::new(executor, ResponseCache::shared(Duration::from_secs(3600)))
}

pub fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        backoff_base_ms: TEST_BACKOFF_MS,
        request_timeout: 5,
        ..Config::default()
    }
}

/// Wraps a payload in the upstream success envelope.
pub fn envelope(data: Value) -> Value {
    json!({ "data": data })
}

pub fn location(name: &str, site: &str, kind: Option<&str>, description: Option<&str>) -> Value {
    json!({
        "locationName": name,
        "siteCode": site,
        "locationType": kind,
        "locationDescription": description,
    })
}
