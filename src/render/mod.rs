//! Capture backends.

/// Capture contract and backend selection.
pub mod backend;
/// `resvg` CPU backend.
pub mod svg;
