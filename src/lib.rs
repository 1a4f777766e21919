//! NEON Gateway - Caching, retrying access layer over the NEON data API
//!
//! Plans upstream requests, caches responses with per-operation TTLs, retries
//! transient failures, and resolves structures at sites through a chain of
//! fallback strategies.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod tasks;

pub use api::AppState;
pub use client::NeonClient;
pub use config::Config;
pub use error::{NeonError, Result};
pub use resolver::{LocationResolver, StructureKind};
pub use tasks::SweepTask;
