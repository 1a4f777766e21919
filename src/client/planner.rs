//! Query Planner
//!
//! [`NeonClient`] exposes one method per upstream resource. Each call is
//! fingerprinted, answered from the response cache when possible, and
//! otherwise planned into a [`RequestDescriptor`] and handed to the executor.

use std::any::Any;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, ETAG};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::cache::{CacheKey, CacheStats, SharedCache};
use crate::client::executor::RequestExecutor;
use crate::client::request::{Params, RequestDescriptor};
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    DataFiles, DataQuery, DownloadDescriptor, Location, LocationNode, LocationOptions, Product,
    Release, Sample, SampleQuery, Site, TaxonomyEntry, TaxonomyQuery,
};

// == Operation ==
/// Logical upstream operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListProducts,
    GetProduct,
    ListSites,
    GetSite,
    QueryData,
    GetLocation,
    ListSiteLocations,
    SearchTaxonomy,
    TrackSample,
    ListReleases,
    GetRelease,
    ListDataFiles,
    ResolveDownload,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::ListProducts => "list_products",
            Operation::GetProduct => "get_product",
            Operation::ListSites => "list_sites",
            Operation::GetSite => "get_site",
            Operation::QueryData => "query_data",
            Operation::GetLocation => "get_location",
            Operation::ListSiteLocations => "list_site_locations",
            Operation::SearchTaxonomy => "search_taxonomy",
            Operation::TrackSample => "track_sample",
            Operation::ListReleases => "list_releases",
            Operation::GetRelease => "get_release",
            Operation::ListDataFiles => "list_data_files",
            Operation::ResolveDownload => "resolve_download",
        }
    }

    /// Cache policy: `None` disables caching, `Some(None)` uses the cache
    /// default TTL.
    pub fn cache_policy(&self, ttls: &TtlPolicy) -> Option<Option<Duration>> {
        match self {
            // Sample custody changes and file URLs are signed with an expiry
            Operation::TrackSample | Operation::ListDataFiles | Operation::ResolveDownload => None,
            Operation::QueryData => Some(Some(ttls.data_query)),
            _ => Some(None),
        }
    }
}

/// Per-operation TTL overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub data_query: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            data_query: Duration::from_secs(30 * 60),
        }
    }
}

/// Bounds on hierarchy expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyLimits {
    /// Children expanded per node
    pub child_cap: usize,
    pub depth_cap: usize,
}

impl Default for HierarchyLimits {
    fn default() -> Self {
        Self {
            child_cap: 20,
            depth_cap: 2,
        }
    }
}

// == Neon Client ==
#[derive(Debug, Clone)]
pub struct NeonClient {
    executor: RequestExecutor,
    cache: SharedCache,
    ttls: TtlPolicy,
    limits: HierarchyLimits,
}

impl NeonClient {
    pub fn new(executor: RequestExecutor, cache: SharedCache) -> Self {
        Self {
            executor,
            cache,
            ttls: TtlPolicy::default(),
            limits: HierarchyLimits::default(),
        }
    }

    pub fn from_config(config: &Config, cache: SharedCache) -> Result<Self> {
        Ok(Self::new(RequestExecutor::from_config(config)?, cache)
            .with_ttls(TtlPolicy {
                data_query: config.data_query_ttl(),
            })
            .with_limits(HierarchyLimits {
                child_cap: config.hierarchy_child_cap,
                depth_cap: config.hierarchy_depth_cap,
            }))
    }

    pub fn with_ttls(mut self, ttls: TtlPolicy) -> Self {
        self.ttls = ttls;
        self
    }

    pub fn with_limits(mut self, limits: HierarchyLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached response. Returns how many were dropped.
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        let count = cache.len();
        cache.clear();
        count
    }

    // == Products ==
    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.fetch(Operation::ListProducts, "/products", Params::new()).await
    }

    pub async fn get_product(&self, product_code: &str) -> Result<Product> {
        let endpoint = format!("/products/{}", encode(product_code));
        self.fetch(Operation::GetProduct, endpoint, Params::new()).await
    }

    // == Sites ==
    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        self.fetch(Operation::ListSites, "/sites", Params::new()).await
    }

    pub async fn get_site(&self, site_code: &str) -> Result<Site> {
        let endpoint = format!("/sites/{}", encode(site_code));
        self.fetch(Operation::GetSite, endpoint, Params::new()).await
    }

    // == Data ==
    /// Plans a data query: GET for site-less and single-site queries, POST
    /// with a JSON body for multi-site queries.
    pub fn plan_data_query(&self, query: &DataQuery) -> RequestDescriptor {
        let params = query.to_params();
        let request = if query.sites.is_multi() {
            RequestDescriptor::post("/data/query", params, query.to_body())
        } else {
            RequestDescriptor::get("/data/query", params)
        };
        request.with_cache(Operation::QueryData.cache_policy(&self.ttls))
    }

    pub async fn query_data(&self, query: &DataQuery) -> Result<Value> {
        let request = self.plan_data_query(query);
        self.dispatch(Operation::QueryData, request).await
    }

    /// Lists the files for one product, site, and month. Never cached.
    pub async fn list_data_files(&self, product_code: &str, site_code: &str, month: &str) -> Result<DataFiles> {
        let endpoint = format!(
            "/data/{}/{}/{}",
            encode(product_code),
            encode(site_code),
            encode(month)
        );
        self.fetch(Operation::ListDataFiles, endpoint, Params::new()).await
    }

    /// Reads size and checksum of a file with a HEAD probe. Never cached.
    pub async fn resolve_download(&self, url: &str) -> Result<DownloadDescriptor> {
        let request = RequestDescriptor::head(url)
            .with_cache(Operation::ResolveDownload.cache_policy(&self.ttls));
        let headers = self.executor.probe(&request).await?;
        Ok(download_descriptor(url, &headers))
    }

    // == Locations ==
    pub async fn get_location(&self, name: &str, options: LocationOptions) -> Result<Location> {
        let endpoint = format!("/locations/{}", encode(name));
        self.fetch(Operation::GetLocation, endpoint, options.to_params()).await
    }

    /// The full catalog of site-level locations.
    pub async fn list_site_locations(&self) -> Result<Vec<Location>> {
        self.fetch(Operation::ListSiteLocations, "/locations/sites", Params::new()).await
    }

    /// Fetches `name` and walks its children, one at a time, down to
    /// `depth` levels (clamped to the configured cap).
    ///
    /// Only the root lookup can fail; a child that cannot be fetched is
    /// skipped.
    pub async fn expand_location(&self, name: &str, depth: usize) -> Result<LocationNode> {
        let depth = depth.min(self.limits.depth_cap);
        let root = self.get_location(name, LocationOptions { hierarchy: true, history: false }).await?;
        Ok(self.expand_node(root, depth).await)
    }

    fn expand_node<'a>(
        &'a self,
        location: Location,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = LocationNode> + Send + 'a>> {
        Box::pin(async move {
            let truncated = depth > 0 && location.location_children.len() > self.limits.child_cap;
            let mut children = Vec::new();

            if depth > 0 {
                for child_name in location.location_children.iter().take(self.limits.child_cap) {
                    let options = LocationOptions { hierarchy: true, history: false };
                    match self.get_location(child_name, options).await {
                        Ok(child) => children.push(self.expand_node(child, depth - 1).await),
                        Err(e) => warn!(child = %child_name, "skipping child location: {}", e),
                    }
                }
            }

            LocationNode {
                location,
                children,
                truncated,
            }
        })
    }

    // == Taxonomy, Samples, Releases ==
    pub async fn search_taxonomy(&self, query: &TaxonomyQuery) -> Result<Vec<TaxonomyEntry>> {
        self.fetch(Operation::SearchTaxonomy, "/taxonomy", query.to_params()).await
    }

    /// Looks up a sample and its custody history. Never cached.
    pub async fn track_sample(&self, query: &SampleQuery) -> Result<Sample> {
        self.fetch(Operation::TrackSample, "/samples/view", query.to_params()).await
    }

    pub async fn list_releases(&self) -> Result<Vec<Release>> {
        self.fetch(Operation::ListReleases, "/releases", Params::new()).await
    }

    pub async fn get_release(&self, tag: &str) -> Result<Release> {
        let endpoint = format!("/releases/{}", encode(tag));
        self.fetch(Operation::GetRelease, endpoint, Params::new()).await
    }

    // == Dispatch ==
    async fn fetch<T>(&self, op: Operation, endpoint: impl Into<String>, params: Params) -> Result<T>
    where
        T: DeserializeOwned + Any + Clone + Send + Sync,
    {
        let request = RequestDescriptor::get(endpoint, params).with_cache(op.cache_policy(&self.ttls));
        self.dispatch(op, request).await
    }

    async fn dispatch<T>(&self, op: Operation, request: RequestDescriptor) -> Result<T>
    where
        T: DeserializeOwned + Any + Clone + Send + Sync,
    {
        let key = cache_key(op, &request);

        if request.cacheable {
            if let Some(hit) = self.cache.write().await.get::<T>(&key) {
                debug!(operation = op.name(), "cache hit");
                return Ok(hit);
            }
            debug!(operation = op.name(), "cache miss");
        }

        let value: T = self.executor.execute(&request).await?;

        if request.cacheable {
            self.cache.write().await.set(key, value.clone(), request.ttl);
        }
        Ok(value)
    }
}

/// Fingerprint of an operation call. Path arguments enter through the
/// endpoint; transport shape does not affect the key.
pub fn cache_key(op: Operation, request: &RequestDescriptor) -> CacheKey {
    let mut params = request.params.as_slice().to_vec();
    params.push(("endpoint".to_string(), request.endpoint.clone()));
    CacheKey::new(op.name(), &params)
}

fn download_descriptor(url: &str, headers: &HeaderMap) -> DownloadDescriptor {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_matches('"').to_string())
    };

    DownloadDescriptor {
        url: url.to_string(),
        size: header(CONTENT_LENGTH.as_str()).and_then(|v| v.parse().ok()),
        checksum: header("x-amz-meta-md5")
            .or_else(|| header("x-goog-meta-md5"))
            .or_else(|| header(ETAG.as_str())),
        content_type: header(CONTENT_TYPE.as_str()),
    }
}
