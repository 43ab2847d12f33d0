use image::{ColorType, DynamicImage};

use crate::foundation::core::{FrameIndex, PixelDepth};
use crate::foundation::error::{KymoError, KymoResult};

/// Interpolated intensity lookup on a single frame.
///
/// Implementations decide what out-of-range coordinates return; the sampler never
/// checks coordinates before calling.
pub trait PixelLookup {
    /// Intensity at the floating-point position `(x, y)`.
    fn value_at(&self, x: f64, y: f64) -> f64;
}

impl<F> PixelLookup for F
where
    F: Fn(f64, f64) -> f64,
{
    fn value_at(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}

/// A single-channel image stack the kymograph is sampled from.
pub trait PixelSource {
    /// Number of frames in the stack.
    fn frame_count(&self) -> usize;

    /// Sample depth, mirrored by the assembled kymograph.
    fn depth(&self) -> PixelDepth;

    /// Bilinear-interpolated intensity at `(x, y)` on `frame`.
    fn interpolated_value(&self, frame: FrameIndex, x: f64, y: f64) -> f64;
}

/// Pins a [`PixelSource`] to one frame so it can be walked by the path sampler.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a, S: ?Sized> {
    source: &'a S,
    frame: FrameIndex,
}

impl<'a, S: PixelSource + ?Sized> FrameView<'a, S> {
    /// View `frame` of `source`.
    pub fn new(source: &'a S, frame: FrameIndex) -> Self {
        Self { source, frame }
    }

    /// Frame this view reads from.
    pub fn frame(&self) -> FrameIndex {
        self.frame
    }
}

impl<S: PixelSource + ?Sized> PixelLookup for FrameView<'_, S> {
    fn value_at(&self, x: f64, y: f64) -> f64 {
        self.source.interpolated_value(self.frame, x, y)
    }
}

/// In-memory grayscale stack with ImageJ-style bilinear interpolation.
///
/// Samples are stored as `f32` regardless of depth; `depth` only records what the
/// frames were decoded from.
#[derive(Clone, Debug)]
pub struct GrayStack {
    width: u32,
    height: u32,
    depth: PixelDepth,
    frames: Vec<Vec<f32>>,
}

impl GrayStack {
    /// Build a stack from row-major frame buffers of `width * height` samples each.
    pub fn new(
        width: u32,
        height: u32,
        depth: PixelDepth,
        frames: Vec<Vec<f32>>,
    ) -> KymoResult<Self> {
        if width == 0 || height == 0 {
            return Err(KymoError::validation("stack frames must be non-empty"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| KymoError::validation("stack frame size overflow"))?;
        for (slot, frame) in frames.iter().enumerate() {
            if frame.len() != expected {
                return Err(KymoError::validation(format!(
                    "frame {} has {} samples, expected {expected}",
                    FrameIndex::from_slot(slot),
                    frame.len()
                )));
            }
        }
        Ok(Self {
            width,
            height,
            depth,
            frames,
        })
    }

    /// Convert decoded images into a stack. All images must share dimensions.
    ///
    /// The depth follows the first image: 8-bit and 16-bit types keep their depth, float
    /// types become [`PixelDepth::Gray32F`]. Color images are reduced to luma.
    pub fn from_images(images: Vec<DynamicImage>) -> KymoResult<Self> {
        let first = images
            .first()
            .ok_or_else(|| KymoError::validation("image stack has no frames"))?;
        let (width, height) = (first.width(), first.height());
        let depth = depth_for(first.color());

        let mut frames = Vec::with_capacity(images.len());
        for (slot, img) in images.into_iter().enumerate() {
            let frame = FrameIndex::from_slot(slot);
            if img.width() != width || img.height() != height {
                return Err(KymoError::validation(format!(
                    "frame {frame} is {}x{}, expected {width}x{height}",
                    img.width(),
                    img.height()
                )));
            }
            if img.color().has_color() {
                tracing::debug!(%frame, color = ?img.color(), "reducing color frame to luma");
            }
            frames.push(luma_samples(&img, depth));
        }

        Self::new(width, height, depth, frames)
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw sample at integer coordinates, or `None` outside the stack.
    pub fn pixel(&self, frame: FrameIndex, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let data = self.frames.get(frame.slot()?)?;
        data.get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    fn bilinear(&self, data: &[f32], x: f64, y: f64) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        if x < -1.0 || x >= w || y < -1.0 || y >= h {
            return 0.0;
        }

        let x = x.clamp(0.0, w - 1.0);
        let y = y.clamp(0.0, h - 1.0);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width as usize - 1);
        let y1 = (y0 + 1).min(self.height as usize - 1);
        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let stride = self.width as usize;
        let at = |px: usize, py: usize| f64::from(data[py * stride + px]);
        let top = at(x0, y0) + fx * (at(x1, y0) - at(x0, y0));
        let bottom = at(x0, y1) + fx * (at(x1, y1) - at(x0, y1));
        top + fy * (bottom - top)
    }
}

impl PixelSource for GrayStack {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn depth(&self) -> PixelDepth {
        self.depth
    }

    fn interpolated_value(&self, frame: FrameIndex, x: f64, y: f64) -> f64 {
        match frame.slot().and_then(|s| self.frames.get(s)) {
            Some(data) => self.bilinear(data, x, y),
            None => 0.0,
        }
    }
}

fn depth_for(color: ColorType) -> PixelDepth {
    match color {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => PixelDepth::Gray8,
        ColorType::L16 | ColorType::La16 | ColorType::Rgb16 | ColorType::Rgba16 => {
            PixelDepth::Gray16
        }
        _ => PixelDepth::Gray32F,
    }
}

fn luma_samples(img: &DynamicImage, depth: PixelDepth) -> Vec<f32> {
    match depth {
        PixelDepth::Gray8 => img.to_luma8().into_raw().into_iter().map(f32::from).collect(),
        PixelDepth::Gray16 => img
            .to_luma16()
            .into_raw()
            .into_iter()
            .map(f32::from)
            .collect(),
        PixelDepth::Gray32F => img.to_luma32f().into_raw(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sample/pixels.rs"]
mod tests;
