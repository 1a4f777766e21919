//! Client Module
//!
//! Upstream access: request planning, cached dispatch, and retrying
//! execution against the NEON data API.

pub mod executor;
pub mod planner;
pub mod request;

pub use executor::{RequestExecutor, RetryPolicy};
pub use planner::{cache_key, HierarchyLimits, NeonClient, Operation, TtlPolicy};
pub use request::{Method, Params, RequestDescriptor};
