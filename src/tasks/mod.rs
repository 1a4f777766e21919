//! Background Tasks Module
//!
//! Contains background tasks that run periodically during gateway operation.
//!
//! # Tasks
//! - Cache sweep: Removes expired response cache entries at a fixed period

mod sweep;

pub use sweep::SweepTask;
