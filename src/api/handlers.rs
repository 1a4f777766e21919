//! API Handlers
//!
//! Thin HTTP adapters over the client operations and the location resolver.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::ResponseCache;
use crate::client::NeonClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    ClearResponse, DataFiles, DataQueryRequest, DownloadDescriptor, DownloadRequest,
    HealthResponse, Location, LocationNode, LocationOptions, MultiSiteQueryRequest, Product,
    Release, Sample, SampleQuery, Site, StatsResponse, StructureRequest, TaxonomyEntry,
    TaxonomyQuery, TreeRequest,
};
use crate::resolver::LocationResolver;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<NeonClient>,
    pub resolver: Arc<LocationResolver>,
}

impl AppState {
    pub fn new(client: Arc<NeonClient>, resolver: LocationResolver) -> Self {
        Self {
            client,
            resolver: Arc::new(resolver),
        }
    }

    /// Builds the client, its cache, and the resolver from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = ResponseCache::shared(config.default_ttl());
        let client = Arc::new(NeonClient::from_config(config, cache)?);
        let resolver = LocationResolver::from_config(client.clone(), config);
        Ok(Self::new(client, resolver))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.client.cache_stats().await.into())
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse::new(state.client.clear_cache().await))
}

pub async fn list_products_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.client.list_products().await?))
}

pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Product>> {
    Ok(Json(state.client.get_product(&code).await?))
}

pub async fn list_sites_handler(State(state): State<AppState>) -> Result<Json<Vec<Site>>> {
    Ok(Json(state.client.list_sites().await?))
}

pub async fn get_site_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Site>> {
    Ok(Json(state.client.get_site(&code).await?))
}

/// Handler for GET /data/query; transport follows the number of sites.
pub async fn query_data_handler(
    State(state): State<AppState>,
    Query(req): Query<DataQueryRequest>,
) -> Result<Json<Value>> {
    Ok(Json(state.client.query_data(&req.into_query()).await?))
}

/// Handler for POST /data/query; always a multi-site query.
pub async fn query_data_multi_handler(
    State(state): State<AppState>,
    Json(req): Json<MultiSiteQueryRequest>,
) -> Result<Json<Value>> {
    Ok(Json(state.client.query_data(&req.into_query()).await?))
}

pub async fn list_data_files_handler(
    State(state): State<AppState>,
    Path((product, site, month)): Path<(String, String, String)>,
) -> Result<Json<DataFiles>> {
    Ok(Json(state.client.list_data_files(&product, &site, &month).await?))
}

pub async fn download_handler(
    State(state): State<AppState>,
    Query(req): Query<DownloadRequest>,
) -> Result<Json<DownloadDescriptor>> {
    Ok(Json(state.client.resolve_download(&req.url).await?))
}

pub async fn get_location_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(options): Query<LocationOptions>,
) -> Result<Json<Location>> {
    Ok(Json(state.client.get_location(&name, options).await?))
}

pub async fn location_tree_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(req): Query<TreeRequest>,
) -> Result<Json<LocationNode>> {
    let depth = req.depth.unwrap_or(1);
    Ok(Json(state.client.expand_location(&name, depth).await?))
}

/// Handler for GET /structures; an empty list means nothing was found.
pub async fn find_structures_handler(
    State(state): State<AppState>,
    Query(req): Query<StructureRequest>,
) -> Json<Vec<Location>> {
    Json(state.resolver.find_towers(req.site.as_deref()).await)
}

pub async fn search_taxonomy_handler(
    State(state): State<AppState>,
    Query(query): Query<TaxonomyQuery>,
) -> Result<Json<Vec<TaxonomyEntry>>> {
    Ok(Json(state.client.search_taxonomy(&query).await?))
}

pub async fn track_sample_handler(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> Result<Json<Sample>> {
    Ok(Json(state.client.track_sample(&query).await?))
}

pub async fn list_releases_handler(State(state): State<AppState>) -> Result<Json<Vec<Release>>> {
    Ok(Json(state.client.list_releases().await?))
}

pub async fn get_release_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<Release>> {
    Ok(Json(state.client.get_release(&tag).await?))
}
