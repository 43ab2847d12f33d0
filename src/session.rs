use crate::foundation::core::{AnchorSpec, FrameIndex, LineWidth};
use crate::foundation::error::{KymoError, KymoResult};
use crate::foundation::geom::Polyline;
use crate::keyframe::interpolate::{DenseFrameSet, InterpMode, interpolate};
use crate::keyframe::store::KeyFrameSet;
use crate::kymo::assemble::{AssembleOpts, assemble};
use crate::kymo::grid::Kymograph;
use crate::sample::pixels::PixelSource;

/// Key frames, their dense expansion, and the anchor for one image stack.
///
/// Every mutation either succeeds completely or leaves the session as it was: the
/// dense set is recomputed on a copy of the key frames and swapped in only when it is
/// free of vertex-count mismatches.
#[derive(Clone, Debug)]
pub struct KymoSession {
    total_frames: usize,
    mode: InterpMode,
    keys: KeyFrameSet,
    dense: DenseFrameSet,
    anchor: AnchorSpec,
}

impl KymoSession {
    /// Empty session for a stack of `total_frames` frames.
    pub fn new(total_frames: usize) -> KymoResult<Self> {
        if total_frames == 0 {
            return Err(KymoError::validation("stack must have at least one frame"));
        }
        Ok(Self {
            total_frames,
            mode: InterpMode::default(),
            keys: KeyFrameSet::new(),
            dense: DenseFrameSet::empty(total_frames),
            anchor: AnchorSpec::default(),
        })
    }

    /// Use `mode` to fill frames between key frames.
    pub fn with_mode(mut self, mode: InterpMode) -> Self {
        self.mode = mode;
        self
    }

    /// Number of frames in the stack.
    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Current fill mode.
    pub fn mode(&self) -> InterpMode {
        self.mode
    }

    /// Recorded key frames.
    pub fn key_frames(&self) -> &KeyFrameSet {
        &self.keys
    }

    /// One path per frame, derived from the key frames.
    pub fn dense(&self) -> &DenseFrameSet {
        &self.dense
    }

    /// Path to overlay on `frame`, if one has been derived.
    pub fn dense_at(&self, frame: FrameIndex) -> Option<&Polyline> {
        self.dense.get(frame)
    }

    /// Current anchor.
    pub fn anchor(&self) -> AnchorSpec {
        self.anchor
    }

    /// Record (or replace) the key frame at `frame` and recompute every dense path.
    ///
    /// Declined with [`KymoError::UserInput`] when the new key frame has a different
    /// vertex count than a neighbouring one under [`InterpMode::Linear`].
    #[tracing::instrument(skip(self, polyline), fields(vertices = polyline.vertex_count()))]
    pub fn record_key_frame(&mut self, frame: FrameIndex, polyline: &Polyline) -> KymoResult<()> {
        if !frame.in_stack(self.total_frames) {
            return Err(KymoError::validation(format!(
                "frame {frame} is outside 1..={}",
                self.total_frames
            )));
        }

        let mut keys = self.keys.clone();
        keys.insert(frame, polyline)?;
        let dense = self.checked_dense(&keys, self.mode)?;

        self.keys = keys;
        self.dense = dense;
        tracing::debug!(keys = self.keys.len(), "key frame recorded");
        Ok(())
    }

    /// Switch the fill mode and recompute the dense paths.
    ///
    /// Declined like [`Self::record_key_frame`] when the existing key frames cannot be
    /// interpolated in the new mode.
    pub fn set_mode(&mut self, mode: InterpMode) -> KymoResult<()> {
        let dense = self.checked_dense(&self.keys, mode)?;
        self.mode = mode;
        self.dense = dense;
        Ok(())
    }

    /// Drop every key frame and dense path, and clear the anchor.
    pub fn reset_key_frames(&mut self) {
        tracing::info!(keys = self.keys.len(), "resetting key frames");
        self.keys.clear();
        self.dense = DenseFrameSet::empty(self.total_frames);
        self.anchor = AnchorSpec::default();
    }

    /// Anchor the kymograph on `vertex_index`.
    ///
    /// An existing anchor must be cleared with [`Self::reset_anchor`] before a different
    /// vertex can be chosen. Choosing the current vertex again does nothing.
    pub fn set_anchor(&mut self, vertex_index: usize) -> KymoResult<()> {
        if self.anchor.exists {
            if self.anchor.vertex_index == vertex_index {
                tracing::debug!(vertex_index, "anchor unchanged");
                return Ok(());
            }
            tracing::warn!(
                current = self.anchor.vertex_index,
                requested = vertex_index,
                "anchor already exists"
            );
            return Err(KymoError::user_input(format!(
                "anchor already exists at vertex {}; reset it first",
                self.anchor.vertex_index
            )));
        }

        if let Some(max) = self.keys.iter().map(|(_, p)| p.vertex_count()).max()
            && vertex_index >= max
        {
            tracing::warn!(
                vertex_index,
                vertices = max,
                "anchor is past the last vertex; lengths will clamp to the whole path"
            );
        }
        self.anchor = AnchorSpec::at(vertex_index);
        Ok(())
    }

    /// Clear the anchor; rows are aligned on the first vertex again.
    pub fn reset_anchor(&mut self) {
        self.anchor = AnchorSpec::default();
    }

    /// Assemble the kymograph of `source` with the current key frames and anchor.
    ///
    /// An even `line_width` is accepted with a warning.
    pub fn make_kymograph<S>(
        &self,
        source: &S,
        line_width: LineWidth,
        opts: &AssembleOpts,
    ) -> KymoResult<Kymograph>
    where
        S: PixelSource + Sync + ?Sized,
    {
        if !line_width.is_odd() {
            tracing::warn!(
                line_width = line_width.get(),
                "line width should be odd; averaging over {} samples",
                2 * line_width.half() + 1
            );
        }
        if source.frame_count() != self.total_frames {
            return Err(KymoError::validation(format!(
                "session covers {} frames but the stack has {}",
                self.total_frames,
                source.frame_count()
            )));
        }
        assemble(
            source,
            &self.keys,
            &self.dense,
            self.anchor,
            line_width,
            opts,
        )
    }

    fn checked_dense(&self, keys: &KeyFrameSet, mode: InterpMode) -> KymoResult<DenseFrameSet> {
        let dense = interpolate(keys, self.total_frames, mode)?;
        if let Some(segment) = dense.skipped().first() {
            return Err(KymoError::user_input(format!(
                "cannot interpolate {segment}; key frames must have the same number of vertices"
            )));
        }
        Ok(dense)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
