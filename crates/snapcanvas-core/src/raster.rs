//! Owned RGBA pixel buffers and their base64/PNG encoding.

use crate::color::Color;
use base64::{Engine, engine::general_purpose::STANDARD};
use thiserror::Error;

/// Raster encode/decode errors.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("invalid base64 data: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("PNG encode failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("pixel buffer of {len} bytes does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, len: usize },
    #[error("empty raster")]
    Empty,
}

/// Result type for raster operations.
pub type RasterResult<T> = Result<T, RasterError>;

/// A straight-alpha RGBA8 pixel buffer, row-major, no padding.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// An image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let pixels = color
            .to_rgba()
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, pixels }
    }

    /// Wrap an existing RGBA8 buffer.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> RasterResult<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(RasterError::SizeMismatch { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of pixel `(x, y)`; caller guarantees bounds.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// The pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([self.pixels[o], self.pixels[o + 1], self.pixels[o + 2], self.pixels[o + 3]])
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let o = self.offset(x, y);
        self.pixels[o..o + 4].copy_from_slice(&rgba);
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> RasterResult<Vec<u8>> {
        if self.is_empty() {
            return Err(RasterError::Empty);
        }
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.pixels)?;
        }
        Ok(buf)
    }

    /// Decode PNG, JPEG or WebP bytes.
    pub fn decode(bytes: &[u8]) -> RasterResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Encode as base64 PNG (no data-URL prefix).
    pub fn to_base64_png(&self) -> RasterResult<String> {
        Ok(STANDARD.encode(self.encode_png()?))
    }

    /// Decode base64 image data, with or without a `data:image/...;base64,` prefix.
    pub fn from_base64(data: &str) -> RasterResult<Self> {
        let bytes = decode_base64(data)?;
        Self::decode(&bytes)
    }
}

/// Decode base64, stripping an optional data-URL header.
pub fn decode_base64(data: &str) -> RasterResult<Vec<u8>> {
    let payload = match data.split_once(";base64,") {
        Some((header, rest)) if header.starts_with("data:") => rest,
        _ => data,
    };
    Ok(STANDARD.decode(payload.trim())?)
}
