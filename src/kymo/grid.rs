use image::{DynamicImage, ImageBuffer, Luma};

use crate::foundation::core::PixelDepth;
use crate::foundation::error::{KymoError, KymoResult};

/// Depth-typed row-major cell storage.
#[derive(Clone, Debug, PartialEq)]
pub enum KymoPixels {
    /// Unsigned 8-bit cells.
    Gray8(Vec<u8>),
    /// Unsigned 16-bit cells.
    Gray16(Vec<u16>),
    /// 32-bit float cells.
    Gray32F(Vec<f32>),
}

impl KymoPixels {
    fn zeroed(depth: PixelDepth, len: usize) -> Self {
        match depth {
            PixelDepth::Gray8 => Self::Gray8(vec![0; len]),
            PixelDepth::Gray16 => Self::Gray16(vec![0; len]),
            PixelDepth::Gray32F => Self::Gray32F(vec![0.0; len]),
        }
    }

    fn len(&self) -> usize {
        match self {
            Self::Gray8(v) => v.len(),
            Self::Gray16(v) => v.len(),
            Self::Gray32F(v) => v.len(),
        }
    }
}

/// Space-time image: one row per frame (row 0 is frame 1), one column per aligned
/// arc-length position.
#[derive(Clone, Debug, PartialEq)]
pub struct Kymograph {
    width: u32,
    height: u32,
    pixels: KymoPixels,
}

impl Kymograph {
    /// Zero-filled kymograph of `width` columns by `height` rows.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> KymoResult<Self> {
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| KymoError::validation("kymograph size overflow"))?;
        Ok(Self {
            width,
            height,
            pixels: KymoPixels::zeroed(depth, len),
        })
    }

    /// Number of columns (`kymoLength`).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows (frames).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Cell depth.
    pub fn depth(&self) -> PixelDepth {
        match self.pixels {
            KymoPixels::Gray8(_) => PixelDepth::Gray8,
            KymoPixels::Gray16(_) => PixelDepth::Gray16,
            KymoPixels::Gray32F(_) => PixelDepth::Gray32F,
        }
    }

    /// Borrow the raw cells.
    pub fn pixels(&self) -> &KymoPixels {
        &self.pixels
    }

    /// Cell value at `(col, row)` widened to `f64`, or `None` outside the grid.
    pub fn get(&self, col: u32, row: u32) -> Option<f64> {
        if col >= self.width || row >= self.height {
            return None;
        }
        let idx = row as usize * self.width as usize + col as usize;
        match &self.pixels {
            KymoPixels::Gray8(v) => v.get(idx).map(|&c| f64::from(c)),
            KymoPixels::Gray16(v) => v.get(idx).map(|&c| f64::from(c)),
            KymoPixels::Gray32F(v) => v.get(idx).map(|&c| f64::from(c)),
        }
    }

    /// One row widened to `f64`, or `None` outside the grid.
    pub fn row(&self, row: u32) -> Option<Vec<f64>> {
        if row >= self.height {
            return None;
        }
        Some((0..self.width).filter_map(|c| self.get(c, row)).collect())
    }

    /// Write `values` into `row` starting at column 0, quantized to the cell depth.
    ///
    /// Values past the last column are dropped.
    pub fn put_row(&mut self, row: u32, values: &[f64]) {
        if row >= self.height {
            tracing::debug!(row, height = self.height, "row outside kymograph dropped");
            return;
        }
        let width = self.width as usize;
        let start = row as usize * width;
        let end = start + width.min(values.len());
        if end > self.pixels.len() {
            return;
        }
        let depth = self.depth();
        let src = values.iter().map(|&v| depth.quantize(v));
        match &mut self.pixels {
            KymoPixels::Gray8(v) => {
                for (cell, q) in v[start..end].iter_mut().zip(src) {
                    *cell = q as u8;
                }
            }
            KymoPixels::Gray16(v) => {
                for (cell, q) in v[start..end].iter_mut().zip(src) {
                    *cell = q as u16;
                }
            }
            KymoPixels::Gray32F(v) => {
                for (cell, q) in v[start..end].iter_mut().zip(src) {
                    *cell = q as f32;
                }
            }
        }
    }

    /// Convert to an [`image::DynamicImage`] for display or saving.
    ///
    /// Integer depths map one-to-one onto `Luma8`/`Luma16`. Float cells are min/max
    /// normalized into `Luma16`, since most formats cannot store float grayscale.
    pub fn to_image(&self) -> KymoResult<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let too_small = || KymoError::validation("kymograph buffer does not match its size");
        let img = match &self.pixels {
            KymoPixels::Gray8(v) => DynamicImage::ImageLuma8(
                ImageBuffer::<Luma<u8>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            KymoPixels::Gray16(v) => DynamicImage::ImageLuma16(
                ImageBuffer::<Luma<u16>, _>::from_raw(w, h, v.clone()).ok_or_else(too_small)?,
            ),
            KymoPixels::Gray32F(v) => {
                let (lo, hi) = v
                    .iter()
                    .filter(|c| c.is_finite())
                    .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &c| {
                        (lo.min(c), hi.max(c))
                    });
                let range = hi - lo;
                let scaled = v
                    .iter()
                    .map(|&c| {
                        if range > 0.0 && c.is_finite() {
                            (((c - lo) / range) * f32::from(u16::MAX)).round() as u16
                        } else {
                            0
                        }
                    })
                    .collect();
                DynamicImage::ImageLuma16(
                    ImageBuffer::<Luma<u16>, _>::from_raw(w, h, scaled).ok_or_else(too_small)?,
                )
            }
        };
        Ok(img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kymo/grid.rs"]
mod tests;
