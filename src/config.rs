//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Public NEON data API root.
pub const DEFAULT_BASE_URL: &str = "https://data.neonscience.org/api/v0";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API root, without trailing slash
    pub base_url: String,
    /// Default TTL in seconds for cached responses
    pub default_ttl: u64,
    /// TTL in seconds for data-availability queries
    pub data_query_ttl: u64,
    /// Outbound attempts per request, including the first
    pub retry_attempts: u32,
    /// Linear backoff base in milliseconds
    pub backoff_base_ms: u64,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    /// Cache sweep interval in seconds
    pub sweep_interval: u64,
    /// Number of sites scanned by a cross-site structure search
    pub cross_site_cap: usize,
    /// Children expanded per node during a hierarchy walk
    pub hierarchy_child_cap: usize,
    /// Maximum depth of a hierarchy walk
    pub hierarchy_depth_cap: usize,
    /// Site code -> previously confirmed structure identifier
    pub known_structures: HashMap<String, String>,
    /// Identifiers observed to recur across sites
    pub recurring_structures: Vec<String>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NEON_BASE_URL` - Upstream API root (default: public NEON API)
    /// - `DEFAULT_TTL` - Default cache TTL in seconds (default: 3600)
    /// - `DATA_QUERY_TTL` - Data query TTL in seconds (default: 1800)
    /// - `RETRY_ATTEMPTS` - Attempts per request (default: 3)
    /// - `BACKOFF_BASE_MS` - Backoff base in milliseconds (default: 1000)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 600)
    /// - `CROSS_SITE_CAP` - Sites scanned without a site filter (default: 10)
    /// - `HIERARCHY_CHILD_CAP` - Children expanded per node (default: 20)
    /// - `HIERARCHY_DEPTH_CAP` - Hierarchy walk depth (default: 2)
    /// - `KNOWN_STRUCTURES` - `SITE=ID,SITE=ID` pairs
    /// - `RECURRING_STRUCTURES` - `ID,ID` list
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("NEON_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            data_query_ttl: parse_var("DATA_QUERY_TTL").unwrap_or(defaults.data_query_ttl),
            retry_attempts: parse_var("RETRY_ATTEMPTS").unwrap_or(defaults.retry_attempts),
            backoff_base_ms: parse_var("BACKOFF_BASE_MS").unwrap_or(defaults.backoff_base_ms),
            request_timeout: parse_var("REQUEST_TIMEOUT").unwrap_or(defaults.request_timeout),
            sweep_interval: parse_var::<u64>("SWEEP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.sweep_interval),
            cross_site_cap: parse_var("CROSS_SITE_CAP").unwrap_or(defaults.cross_site_cap),
            hierarchy_child_cap: parse_var("HIERARCHY_CHILD_CAP")
                .unwrap_or(defaults.hierarchy_child_cap),
            hierarchy_depth_cap: parse_var("HIERARCHY_DEPTH_CAP")
                .unwrap_or(defaults.hierarchy_depth_cap),
            known_structures: env::var("KNOWN_STRUCTURES")
                .map(|v| parse_pairs(&v))
                .unwrap_or(defaults.known_structures),
            recurring_structures: env::var("RECURRING_STRUCTURES")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.recurring_structures),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    pub fn data_query_ttl(&self) -> Duration {
        Duration::from_secs(self.data_query_ttl)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_ttl: 3600,
            data_query_ttl: 1800,
            retry_attempts: 3,
            backoff_base_ms: 1000,
            request_timeout: 30,
            sweep_interval: 600,
            cross_site_cap: 10,
            hierarchy_child_cap: 20,
            hierarchy_depth_cap: 2,
            known_structures: HashMap::from([("SRER".to_string(), "TOWER104454".to_string())]),
            recurring_structures: vec!["TOWER".to_string(), "FLUXTOWER".to_string()],
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Parses `A=x, B=y` into a map, upper-casing site codes.
fn parse_pairs(raw: &str) -> HashMap<String, String> {
    raw.split(',')
        .filter_map(|pair| pair.split_once('='))
        .map(|(site, id)| (site.trim().to_uppercase(), id.trim().to_string()))
        .filter(|(site, id)| !site.is_empty() && !id.is_empty())
        .collect()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
