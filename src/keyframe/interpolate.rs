use crate::foundation::core::FrameIndex;
use crate::foundation::error::{KymoError, KymoResult};
use crate::foundation::geom::Polyline;
use crate::keyframe::store::KeyFrameSet;

/// How frames between two key frames are filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    /// Vertex-wise linear blend between the surrounding key frames.
    #[default]
    Linear,
    /// Repeat the earlier key frame until the next one.
    Hold,
}

/// A key-frame pair whose polylines could not be blended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedSegment {
    /// Earlier key frame of the pair.
    pub start: FrameIndex,
    /// Later key frame of the pair.
    pub end: FrameIndex,
    /// Vertex count at `start`.
    pub start_vertices: usize,
    /// Vertex count at `end`.
    pub end_vertices: usize,
}

impl std::fmt::Display for SkippedSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "frames {}..{}: {} vs {} vertices",
            self.start, self.end, self.start_vertices, self.end_vertices
        )
    }
}

/// One polyline slot per frame of the stack.
///
/// Slots between the first and last key frame are filled by interpolation, slots outside
/// that range repeat the nearest key frame. Frames strictly inside a [`SkippedSegment`]
/// stay empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DenseFrameSet {
    slots: Vec<Option<Polyline>>,
    skipped: Vec<SkippedSegment>,
}

impl DenseFrameSet {
    /// All-empty set covering `total_frames` frames.
    pub fn empty(total_frames: usize) -> Self {
        Self {
            slots: vec![None; total_frames],
            skipped: Vec::new(),
        }
    }

    /// Number of frames covered.
    pub fn total_frames(&self) -> usize {
        self.slots.len()
    }

    /// Polyline for `frame`, if populated.
    pub fn get(&self, frame: FrameIndex) -> Option<&Polyline> {
        self.slots.get(frame.slot()?)?.as_ref()
    }

    /// Every frame with its slot, in frame order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, Option<&Polyline>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(slot, p)| (FrameIndex::from_slot(slot), p.as_ref()))
    }

    /// Key-frame pairs that were not interpolated because their vertex counts differ.
    pub fn skipped(&self) -> &[SkippedSegment] {
        &self.skipped
    }

    /// Return `true` when every frame has a polyline.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Return `true` when no frame has a polyline.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn set(&mut self, frame: FrameIndex, polyline: Polyline) {
        if let Some(slot) = frame.slot().and_then(|s| self.slots.get_mut(s)) {
            *slot = Some(polyline);
        }
    }
}

/// Expand sparse key frames into one polyline per frame `1..=total_frames`.
///
/// - no keys: every slot stays empty
/// - one key: every slot receives a copy of it
/// - otherwise the first key is propagated back to frame 1, the last key forward to
///   `total_frames`, and each consecutive pair `(a, b)` fills frames `a..b` according
///   to `mode`
///
/// In [`InterpMode::Linear`] each vertex is computed directly from its two key
/// positions, `va + (vb - va) * (f - a) / (b - a)`. A pair with different vertex counts
/// is reported in [`DenseFrameSet::skipped`] and left unfilled; other pairs are
/// unaffected.
#[tracing::instrument(skip(keys), fields(keys = keys.len()))]
pub fn interpolate(
    keys: &KeyFrameSet,
    total_frames: usize,
    mode: InterpMode,
) -> KymoResult<DenseFrameSet> {
    if total_frames == 0 {
        return Err(KymoError::validation("stack must have at least one frame"));
    }
    if let Some((frame, _)) = keys.iter().find(|(f, _)| !f.in_stack(total_frames)) {
        return Err(KymoError::validation(format!(
            "key frame {frame} is outside the stack (1..={total_frames})"
        )));
    }

    let mut dense = DenseFrameSet::empty(total_frames);
    let mut anchors: Vec<(FrameIndex, &Polyline)> = keys.iter().collect();
    let (Some(&(first, first_poly)), Some(&(last, last_poly))) = (anchors.first(), anchors.last())
    else {
        return Ok(dense);
    };

    if anchors.len() == 1 {
        for slot in &mut dense.slots {
            *slot = Some(first_poly.clone());
        }
        return Ok(dense);
    }

    let stack_end = FrameIndex(total_frames as u64);
    if first != FrameIndex::FIRST {
        anchors.insert(0, (FrameIndex::FIRST, first_poly));
    }
    if last != stack_end {
        anchors.push((stack_end, last_poly));
    }

    for pair in anchors.windows(2) {
        let (a, pa) = pair[0];
        let (b, pb) = pair[1];
        fill_segment(&mut dense, (a, pa), (b, pb), mode);
    }
    dense.set(stack_end, last_poly.clone());

    Ok(dense)
}

/// Write frames `a..b` (the end frame belongs to the next pair).
fn fill_segment(
    dense: &mut DenseFrameSet,
    (a, pa): (FrameIndex, &Polyline),
    (b, pb): (FrameIndex, &Polyline),
    mode: InterpMode,
) {
    dense.set(a, pa.clone());

    match mode {
        InterpMode::Hold => {
            for f in a.0 + 1..b.0 {
                dense.set(FrameIndex(f), pa.clone());
            }
        }
        InterpMode::Linear => {
            if pa.vertex_count() != pb.vertex_count() {
                let skipped = SkippedSegment {
                    start: a,
                    end: b,
                    start_vertices: pa.vertex_count(),
                    end_vertices: pb.vertex_count(),
                };
                tracing::warn!(%skipped, "polylines must have the same number of vertices");
                dense.skipped.push(skipped);
                return;
            }

            let span = (b.0 - a.0) as f64;
            for f in a.0 + 1..b.0 {
                let t = (f - a.0) as f64 / span;
                if let Some(p) = Polyline::lerp(pa, pb, t) {
                    dense.set(FrameIndex(f), p);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keyframe/interpolate.rs"]
mod tests;
