//! Read-only review data consumed by the engine.
//!
//! Reviews and pipelines are produced by external editors; nothing here mutates them.

/// Time-series pipeline grids and frame sampling.
pub mod pipeline;
/// Product and pipeline kinds.
pub mod product;
/// Loosely typed review document.
pub mod record;
