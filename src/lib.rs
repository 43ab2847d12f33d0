//! Dynamic kymograph engine.
//!
//! A kymograph is a space-time image built from a stack of grayscale frames: each row is
//! the intensity profile sampled along a path on one frame, and rows are stacked in frame
//! order. The path may move between frames. The user records it on a few key frames and
//! the engine fills in every other frame.
//!
//! The pipeline is:
//!
//! - Record key-frame polylines on a [`KymoSession`]
//! - Interpolate them into one path per frame ([`keyframe::interpolate::interpolate`])
//! - Sample each path, averaged across a line width ([`sample::width::average_width`])
//! - Align rows on an anchor vertex and assemble the [`Kymograph`]
//!   ([`kymo::assemble::assemble`])
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Tuning knobs read from JSON.
pub mod config;
/// Core value types, geometry and errors.
pub mod foundation;
pub mod keyframe;
pub mod kymo;
/// Path sampling against a pixel source.
pub mod sample;
/// Key-frame bookkeeping and kymograph assembly entry point.
pub mod session;

pub use crate::config::KymoConfig;
pub use crate::foundation::core::{AnchorSpec, FrameIndex, LineWidth, PixelDepth, Point, Vec2};
pub use crate::foundation::error::{KymoError, KymoResult};
pub use crate::foundation::geom::Polyline;
pub use crate::keyframe::interpolate::{DenseFrameSet, InterpMode, SkippedSegment};
pub use crate::keyframe::store::KeyFrameSet;
pub use crate::kymo::assemble::{AssembleOpts, RowThreading};
pub use crate::kymo::grid::{KymoPixels, Kymograph};
pub use crate::sample::pixels::{FrameView, GrayStack, PixelLookup, PixelSource};
pub use crate::session::KymoSession;
