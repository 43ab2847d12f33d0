use std::borrow::Cow;

use crate::foundation::core::Vec2;
use crate::foundation::geom::Polyline;
use crate::sample::pixels::PixelLookup;

/// Walk `polyline` at unit arc-length spacing and read one intensity per step.
///
/// `shift` is added to both coordinates of every vertex before walking. This is a
/// diagonal translation, not an offset along the path normal, and width averaging
/// relies on exactly that behaviour.
///
/// Sample `k` lies at arc length `k`, so the result has `floor(arc_length)` entries.
/// The fractional distance left at the end of one segment is carried into the next,
/// which keeps spacing uniform across vertices. Zero-length segments are skipped;
/// polylines with fewer than two vertices yield an empty sequence.
pub fn sample_path<L>(polyline: &Polyline, lookup: &L, shift: f64) -> Vec<f64>
where
    L: PixelLookup + ?Sized,
{
    let n = polyline.sample_len();
    let mut values = vec![0.0; n];
    if n == 0 {
        return values;
    }

    let path = if shift == 0.0 {
        Cow::Borrowed(polyline)
    } else {
        Cow::Owned(polyline.translated(Vec2::new(shift, shift)))
    };

    let mut cursor = 0usize;
    // Distance into the current segment of the next sample.
    let mut offset = 0.0f64;

    for seg in path.points().windows(2) {
        let (a, b) = (seg[0], seg[1]);
        let len = a.distance(b);
        if len == 0.0 || !len.is_finite() {
            continue;
        }
        let dir = (b - a) / len;

        while offset <= len {
            // The walk reaches arc length floor(L) but only 0..floor(L) is kept.
            let Some(slot) = values.get_mut(cursor) else {
                return values;
            };
            let p = a + dir * offset;
            *slot = lookup.value_at(p.x, p.y);
            cursor += 1;
            offset += 1.0;
        }
        offset -= len;
    }

    if cursor < n {
        tracing::trace!(written = cursor, len = n, "path walk ended short of the arc length");
    }
    values
}

#[cfg(test)]
#[path = "../../tests/unit/sample/path.rs"]
mod tests;
