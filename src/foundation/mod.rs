//! Shared primitives: error taxonomy, geometry/color types and pixel math.

/// Canvas, color and geometry types.
pub mod core;
/// Error taxonomy used by every engine API.
pub mod error;
/// Premultiplied-alpha pixel helpers.
pub mod math;
