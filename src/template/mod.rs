//! Template definitions, element availability and page planning.

/// Element availability per product.
pub mod availability;
/// Built-in and JSON-loaded template definitions.
pub mod catalog;
/// Page capacity and slicing.
pub mod pagination;
