use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::foundation::core::{AnchorSpec, FrameIndex, LineWidth};
use crate::foundation::error::{KymoError, KymoResult};
use crate::foundation::geom::Polyline;
use crate::keyframe::interpolate::DenseFrameSet;
use crate::keyframe::store::KeyFrameSet;
use crate::kymo::grid::Kymograph;
use crate::sample::pixels::{FrameView, PixelSource};
use crate::sample::width::average_width;

/// Threading controls for the row pass.
#[derive(Clone, Debug, Default)]
pub struct RowThreading {
    /// Compute rows on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Options for [`assemble`].
#[derive(Clone, Debug, Default)]
pub struct AssembleOpts {
    /// Row-pass threading.
    pub threading: RowThreading,
    /// Cooperative cancel flag, checked before every row.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Output of the sizing pass, fixed for every row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KymoLayout {
    /// Width of the kymograph: the longest sampled key frame.
    pub kymo_length: usize,
    /// Largest arc-length distance to the anchor seen on any key frame.
    pub max_anchor_index: usize,
}

/// Sizing pass over the key frames only.
///
/// Width averaging only translates the path, so a key frame's averaged sequence is
/// exactly [`Polyline::sample_len`] long and no pixels need to be read here.
pub fn measure(keys: &KeyFrameSet, anchor: AnchorSpec) -> KymoLayout {
    keys.iter()
        .fold(KymoLayout::default(), |layout, (_, polyline)| KymoLayout {
            kymo_length: layout.kymo_length.max(polyline.sample_len()),
            max_anchor_index: layout.max_anchor_index.max(anchor_index(polyline, anchor)),
        })
}

/// Whole pixels of arc length between the first vertex and the anchor vertex.
pub fn anchor_index(polyline: &Polyline, anchor: AnchorSpec) -> usize {
    let len = polyline.length_before(anchor.effective_vertex());
    if len.is_finite() && len > 0.0 {
        len.floor() as usize
    } else {
        0
    }
}

/// Column where a row whose anchor sits at `anchor_index` must start.
///
/// Offsets of a single pixel are ignored, matching the reference behaviour.
pub fn start_index(max_anchor_index: usize, anchor_index: usize) -> usize {
    match max_anchor_index.checked_sub(anchor_index) {
        Some(diff) if diff > 1 => diff,
        _ => 0,
    }
}

/// Place `pixels` into a zeroed row of `kymo_length` cells starting at `start`.
///
/// Cells that would land past the end are dropped.
pub fn align_row(pixels: &[f64], kymo_length: usize, start: usize) -> Vec<f64> {
    let mut row = vec![0.0; kymo_length];
    let room = kymo_length.saturating_sub(start);
    let kept = pixels.len().min(room);
    if kept > 0 {
        row[start..start + kept].copy_from_slice(&pixels[..kept]);
    }
    if kept < pixels.len() {
        tracing::trace!(
            dropped = pixels.len() - kept,
            start,
            kymo_length,
            "aligned row overflows kymograph width"
        );
    }
    row
}

/// Build the kymograph: one width-averaged, anchor-aligned row per frame.
///
/// The sizing pass ([`measure`]) runs over `keys` before any row is sampled; rows then
/// read their polyline from `dense` and their pixels from `source`. Frames without a
/// dense polyline produce a zero row.
///
/// Fails with [`KymoError::UserInput`] when `keys` is empty, and with
/// [`KymoError::Cancelled`] as soon as the cancel flag is observed.
#[tracing::instrument(skip_all, fields(frames = dense.total_frames(), keys = keys.len()))]
pub fn assemble<S>(
    source: &S,
    keys: &KeyFrameSet,
    dense: &DenseFrameSet,
    anchor: AnchorSpec,
    line_width: LineWidth,
    opts: &AssembleOpts,
) -> KymoResult<Kymograph>
where
    S: PixelSource + Sync + ?Sized,
{
    if keys.is_empty() {
        return Err(KymoError::user_input("no key frames recorded"));
    }
    let total_frames = dense.total_frames();
    if total_frames != source.frame_count() {
        return Err(KymoError::validation(format!(
            "dense paths cover {total_frames} frames but the stack has {}",
            source.frame_count()
        )));
    }

    let layout = measure(keys, anchor);
    let width = u32::try_from(layout.kymo_length)
        .map_err(|_| KymoError::validation("kymograph is too wide"))?;
    let height =
        u32::try_from(total_frames).map_err(|_| KymoError::validation("too many frames"))?;
    tracing::debug!(?layout, "sizing pass complete");

    let cancel = opts.cancel.as_deref();
    let row_for = |slot: usize| -> KymoResult<Vec<f64>> {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(KymoError::Cancelled);
        }
        let frame = FrameIndex::from_slot(slot);
        Ok(frame_row(source, frame, dense.get(frame), anchor, line_width, layout))
    };

    let rows: Vec<Vec<f64>> = if opts.threading.parallel {
        let pool = build_thread_pool(opts.threading.threads)?;
        pool.install(|| {
            (0..total_frames)
                .into_par_iter()
                .map(row_for)
                .collect::<KymoResult<Vec<_>>>()
        })?
    } else {
        (0..total_frames)
            .map(row_for)
            .collect::<KymoResult<Vec<_>>>()?
    };

    let mut kymo = Kymograph::new(width, height, source.depth())?;
    for (r, row) in (0..height).zip(&rows) {
        kymo.put_row(r, row);
    }
    Ok(kymo)
}

fn frame_row<S>(
    source: &S,
    frame: FrameIndex,
    polyline: Option<&Polyline>,
    anchor: AnchorSpec,
    line_width: LineWidth,
    layout: KymoLayout,
) -> Vec<f64>
where
    S: PixelSource + ?Sized,
{
    let Some(polyline) = polyline else {
        tracing::warn!(%frame, "no path for frame; writing an empty row");
        return vec![0.0; layout.kymo_length];
    };
    let view = FrameView::new(source, frame);
    let pixels = average_width(polyline, &view, line_width);
    let start = start_index(layout.max_anchor_index, anchor_index(polyline, anchor));
    align_row(&pixels, layout.kymo_length, start)
}

fn build_thread_pool(threads: Option<usize>) -> KymoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(KymoError::validation(
            "row threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| KymoError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/kymo/assemble.rs"]
mod tests;
