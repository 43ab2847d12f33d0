//! Shared building blocks: frame indices, widths, anchors, polylines and the error type.

/// Frame indices, line widths, anchors and pixel depths.
pub mod core;
/// Crate error type.
pub mod error;
/// Polylines and arc-length helpers.
pub mod geom;
