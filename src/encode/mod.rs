//! Binary encoders.
//!
//! Still images are encoded from a single captured frame; animations are queued frame by frame
//! and encoded once the capture loop finishes.

/// Animated GIF encoding on a worker pool.
pub mod gif;
/// Single-image codecs (PNG, JPEG, single-frame GIF, SVG).
pub mod raster;
