use crate::foundation::error::{KymoError, KymoResult};

pub use kurbo::{Point, Vec2};

/// 1-based frame index into an image stack.
///
/// Frame `1` is the first slice; there is no frame `0`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// The first frame of every stack.
    pub const FIRST: Self = Self(1);

    /// Build the frame index that owns 0-based storage slot `slot`.
    pub fn from_slot(slot: usize) -> Self {
        Self(slot as u64 + 1)
    }

    /// 0-based storage slot for this frame, or `None` for the invalid frame `0`.
    pub fn slot(self) -> Option<usize> {
        self.0.checked_sub(1).map(|s| s as usize)
    }

    /// Return `true` when the frame lies inside a stack of `total_frames` frames.
    pub fn in_stack(self, total_frames: usize) -> bool {
        self.0 >= 1 && self.0 <= total_frames as u64
    }
}

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of shifted paths averaged per sample. Always at least 1.
///
/// Odd widths are expected; an even width is accepted as given (callers warn about it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LineWidth(u32);

impl LineWidth {
    /// Width of a single-pixel path.
    pub const ONE: Self = Self(1);

    /// Validate a raw width (`0` is rejected).
    pub fn new(width: u32) -> KymoResult<Self> {
        if width == 0 {
            return Err(KymoError::validation("line width must be >= 1"));
        }
        Ok(Self(width))
    }

    /// Raw width value.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Largest shift sampled on each side of the path (`floor(width / 2)`).
    pub fn half(self) -> u32 {
        self.0 / 2
    }

    /// Return `true` for odd widths.
    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }
}

impl Default for LineWidth {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for LineWidth {
    type Error = KymoError;

    fn try_from(value: u32) -> KymoResult<Self> {
        Self::new(value)
    }
}

impl From<LineWidth> for u32 {
    fn from(value: LineWidth) -> Self {
        value.0
    }
}

/// Which polyline vertex anchors the alignment of every kymograph row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnchorSpec {
    /// Vertex index in the shared polyline topology.
    pub vertex_index: usize,
    /// Whether the user chose an anchor at all.
    pub exists: bool,
}

impl AnchorSpec {
    /// Anchor explicitly placed on `vertex_index`.
    pub fn at(vertex_index: usize) -> Self {
        Self {
            vertex_index,
            exists: true,
        }
    }

    /// Vertex used for alignment; an unset anchor behaves as vertex `0`.
    pub fn effective_vertex(self) -> usize {
        if self.exists { self.vertex_index } else { 0 }
    }
}

/// Sample depth of the source stack, mirrored by the kymograph it produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelDepth {
    /// Unsigned 8-bit grayscale.
    Gray8,
    /// Unsigned 16-bit grayscale.
    Gray16,
    /// 32-bit float grayscale.
    Gray32F,
}

impl PixelDepth {
    /// Convert a sampled intensity to this depth the way a direct pixel write does:
    /// integer depths round and clamp, float depth is stored as-is.
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            Self::Gray8 => value.round().clamp(0.0, f64::from(u8::MAX)),
            Self::Gray16 => value.round().clamp(0.0, f64::from(u16::MAX)),
            Self::Gray32F => value,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
