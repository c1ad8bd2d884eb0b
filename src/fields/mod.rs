//! Field resolution: element ids to display-ready values.

/// Element id dispatch table.
pub mod resolver;
/// Renderable values and compound records.
pub mod value;
