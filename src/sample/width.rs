use crate::foundation::core::LineWidth;
use crate::foundation::geom::Polyline;
use crate::sample::path::sample_path;
use crate::sample::pixels::PixelLookup;

/// Emulate a thick line by averaging paths shifted by `-w/2..=w/2`.
///
/// For every shift `s` in `1..=floor(w/2)` the walks at `+s` and `-s` are added into the
/// unshifted walk, then every element is divided by `w` itself. With an even width this
/// divisor does not match the number of summed walks; that behaviour is kept as-is.
pub fn average_width<L>(polyline: &Polyline, lookup: &L, line_width: LineWidth) -> Vec<f64>
where
    L: PixelLookup + ?Sized,
{
    let mut pixels = sample_path(polyline, lookup, 0.0);

    for shift in 1..=line_width.half() {
        let shift = f64::from(shift);
        let plus = sample_path(polyline, lookup, shift);
        let minus = sample_path(polyline, lookup, -shift);
        accumulate_truncating(&mut pixels, &plus);
        accumulate_truncating(&mut pixels, &minus);
    }

    let divisor = f64::from(line_width.get());
    for v in &mut pixels {
        *v /= divisor;
    }
    pixels
}

/// Elementwise `acc[i] += other[i]`, truncating `acc` to the shorter of the two.
pub(crate) fn accumulate_truncating(acc: &mut Vec<f64>, other: &[f64]) {
    if other.len() < acc.len() {
        tracing::debug!(
            from = acc.len(),
            to = other.len(),
            "shifted walk is shorter; truncating width average"
        );
        acc.truncate(other.len());
    }
    for (a, &b) in acc.iter_mut().zip(other) {
        *a += b;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/width.rs"]
mod tests;
