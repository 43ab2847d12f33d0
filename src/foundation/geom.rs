use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{KymoError, KymoResult};

/// Ordered list of 2D vertices walked from first to last.
///
/// A `Polyline` owns its vertices; storing one as a key frame always clones it, so later
/// edits by the caller never reach the stored copy.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Wrap a vertex list as-is. Degenerate lists are allowed here; see [`Polyline::validate`].
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Build from `(x, y)` pairs.
    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Borrow the vertices.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Check the polyline is usable as a key frame: at least two finite vertices.
    pub fn validate(&self) -> KymoResult<()> {
        if self.points.len() < 2 {
            return Err(KymoError::validation(format!(
                "polyline needs at least 2 vertices, got {}",
                self.points.len()
            )));
        }
        if !self.points.iter().all(|p| p.is_finite()) {
            return Err(KymoError::validation(
                "polyline vertices must have finite coordinates",
            ));
        }
        Ok(())
    }

    /// Copy with every vertex offset by `delta`.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.points.iter().map(|&p| p + delta).collect())
    }

    /// Euclidean length of each segment, in walk order (`vertex_count - 1` entries).
    pub fn segment_lengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.windows(2).map(|w| w[0].distance(w[1]))
    }

    /// Total arc length.
    pub fn arc_length(&self) -> f64 {
        self.segment_lengths().sum()
    }

    /// Number of unit-spaced samples a walk along this polyline produces (`floor(arc_length)`).
    pub fn sample_len(&self) -> usize {
        if self.points.len() < 2 {
            return 0;
        }
        let len = self.arc_length();
        if len.is_finite() && len > 0.0 {
            len.floor() as usize
        } else {
            0
        }
    }

    /// Arc length from the first vertex up to `vertex`.
    ///
    /// Indices past the last vertex clamp to the full length.
    pub fn length_before(&self, vertex: usize) -> f64 {
        self.segment_lengths().take(vertex).sum()
    }

    /// Linear blend of two polylines with identical topology: `a + (b - a) * t`.
    ///
    /// Returns `None` when the vertex counts differ.
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Option<Self> {
        if a.points.len() != b.points.len() {
            return None;
        }
        let points = a
            .points
            .iter()
            .zip(&b.points)
            .map(|(&pa, &pb)| pa + (pb - pa) * t)
            .collect();
        Some(Self::new(points))
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/geom.rs"]
mod tests;
