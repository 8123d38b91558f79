//! Page image cleanup ahead of OCR.

use image::{DynamicImage, GrayImage, Luma};

/// 3x3 sharpen kernel, applied with a divisor of 16.
const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-2, -2, -2], [-2, 32, -2], [-2, -2, -2]];
const SHARPEN_SCALE: i32 = 16;

pub const DEFAULT_CONTRAST_FACTOR: f32 = 2.0;

/// Grayscale, sharpen, then contrast boost.
#[derive(Debug, Clone, Copy)]
pub struct ImagePreprocessor {
    contrast_factor: f32,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRAST_FACTOR)
    }
}

impl ImagePreprocessor {
    pub fn new(contrast_factor: f32) -> Self {
        Self { contrast_factor }
    }

    /// Output has the same dimensions as the input.
    pub fn preprocess(&self, page: &DynamicImage) -> GrayImage {
        let gray = page.to_luma8();
        let sharpened = sharpen(&gray);
        enhance_contrast(&sharpened, self.contrast_factor)
    }
}

/// Border pixels are copied through unchanged. `imageops::filter3x3`
/// resamples the border instead, which shifts OCR output on edge glyphs,
/// so the convolution stays hand-written.
fn sharpen(src: &GrayImage) -> GrayImage {
    let (width, height) = src.dimensions();
    let mut out = src.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = 0i32;
            for (ky, row) in SHARPEN_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let px = src.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1)[0] as i32;
                    acc += px * weight;
                }
            }
            let value = (acc as f32 / SHARPEN_SCALE as f32).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x, y, Luma([value]));
        }
    }
    out
}

/// Scale each pixel's distance from the mean intensity by `factor`.
fn enhance_contrast(src: &GrayImage, factor: f32) -> GrayImage {
    let pixel_count = src.as_raw().len();
    if pixel_count == 0 {
        return src.clone();
    }

    let total: u64 = src.as_raw().iter().map(|&p| p as u64).sum();
    let mean = (total as f32 / pixel_count as f32).round();

    let mut out = src.clone();
    for pixel in out.pixels_mut() {
        let value = mean + factor * (pixel[0] as f32 - mean);
        pixel[0] = value.round().clamp(0.0, 255.0) as u8;
    }
    out
}
