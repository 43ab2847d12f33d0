//! Intensity sampling along polylines.

/// Unit arc-length walk along a single polyline.
pub mod path;
/// Pixel lookup traits and the in-memory grayscale stack.
pub mod pixels;
/// Line-width emulation by averaging shifted walks.
pub mod width;
