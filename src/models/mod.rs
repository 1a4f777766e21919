//! Data models
//!
//! Domain resources decoded from upstream, parameter objects for the client
//! operations, and the DTOs of the gateway HTTP surface.

pub mod params;
pub mod requests;
pub mod resources;
pub mod responses;

// Re-export commonly used types
pub use params::{DataQuery, LocationOptions, SampleQuery, SiteSelector, TaxonomyQuery};
pub use requests::{
    DataQueryRequest, DownloadRequest, MultiSiteQueryRequest, StructureRequest, TreeRequest,
};
pub use resources::{
    DataFile, DataFiles, DownloadDescriptor, Location, LocationNode, Product, Release, Sample,
    SampleView, Site, TaxonomyEntry,
};
pub use responses::{ClearResponse, HealthResponse, StatsResponse};
