//! Kymograph assembly: sizing, anchor alignment, and the output pixel grid.

/// Sizing pass and per-frame row assembly.
pub mod assemble;
/// Depth-matched output grid.
pub mod grid;
