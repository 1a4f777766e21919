//! API Module
//!
//! JSON-over-HTTP surface for tool-calling clients.
//!
//! # Endpoints
//! - `GET /health`, `GET /stats`, `DELETE /cache` - Gateway status and cache control
//! - `GET /products[/:code]`, `GET /sites[/:code]` - Catalog lookups
//! - `GET|POST /data/query` - Data availability (POST for multi-site queries)
//! - `GET /data/:product/:site/:month`, `GET /download` - Files and file metadata
//! - `GET /locations/:name[/tree]` - Named locations and their hierarchy
//! - `GET /structures` - Tower resolution at a site or across sites
//! - `GET /taxonomy`, `GET /samples`, `GET /releases[/:tag]`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
