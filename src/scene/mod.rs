//! Live composition model and its mount point.

/// Builders from review data to compositions.
pub mod compose;
/// Drawable scene and SVG emission.
pub mod composition;
/// Composition mount point and export ownership.
pub mod stage;
