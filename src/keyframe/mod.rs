//! Key frames and their expansion into one path per frame.

/// Sparse-to-dense path interpolation.
pub mod interpolate;
/// The sparse key-frame map.
pub mod store;
