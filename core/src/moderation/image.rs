//! moderation/image.rs
//! RGBA bitmaps and the resize applied before classification.

use thiserror::Error;

use crate::types::TransferableFile;

const CHANNELS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("unsupported image: {0}")]
    Unsupported(String),

    #[error("bitmap {width}x{height} needs {need} bytes, got {have}")]
    InvalidBitmap { width: u32, height: u32, need: usize, have: usize },
}

/// Decoded RGBA8 image.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bitmap({}x{})", self.width, self.height)
    }
}

impl Bitmap {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let need = width as usize * height as usize * CHANNELS;
        if width == 0 || height == 0 || pixels.len() != need {
            return Err(ImageError::InvalidBitmap { width, height, need, have: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let i = (y * self.width as usize + x) * CHANNELS;
        &self.pixels[i..i + CHANNELS]
    }
}

/// Turns file bytes into a bitmap. Implemented by whatever image stack the host has.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, file: &TransferableFile) -> Result<Bitmap, ImageError>;
}

/// Only images go through moderation.
pub fn is_moderatable(file: &TransferableFile) -> bool {
    file.mime_type.starts_with("image/")
}

/// Scale `bitmap` so it fits `max_size` on its longer side, keeping the aspect ratio.
///
/// Small images are scaled up. Sampling is bilinear.
pub fn fit_image(bitmap: &Bitmap, max_size: u32) -> Bitmap {
    let (w, h) = (bitmap.width as f64, bitmap.height as f64);
    let scale = (max_size as f64 / w).min(max_size as f64 / h);
    let nw = ((w * scale).round() as u32).max(1);
    let nh = ((h * scale).round() as u32).max(1);

    if nw == bitmap.width && nh == bitmap.height {
        return bitmap.clone();
    }

    let (sw, sh) = (bitmap.width as usize, bitmap.height as usize);
    let x_ratio = w / nw as f64;
    let y_ratio = h / nh as f64;
    let mut pixels = Vec::with_capacity(nw as usize * nh as usize * CHANNELS);

    for y in 0..nh as usize {
        // Sample at pixel centers.
        let sy = ((y as f64 + 0.5) * y_ratio - 0.5).clamp(0.0, (sh - 1) as f64);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(sh - 1);
        let fy = sy - y0 as f64;

        for x in 0..nw as usize {
            let sx = ((x as f64 + 0.5) * x_ratio - 0.5).clamp(0.0, (sw - 1) as f64);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(sw - 1);
            let fx = sx - x0 as f64;

            let (p00, p10) = (bitmap.pixel(x0, y0), bitmap.pixel(x1, y0));
            let (p01, p11) = (bitmap.pixel(x0, y1), bitmap.pixel(x1, y1));
            for c in 0..CHANNELS {
                let top = p00[c] as f64 * (1.0 - fx) + p10[c] as f64 * fx;
                let bottom = p01[c] as f64 * (1.0 - fx) + p11[c] as f64 * fx;
                pixels.push((top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    Bitmap { width: nw, height: nh, pixels }
}
