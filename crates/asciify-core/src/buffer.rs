//! Pixel buffers and snapshot surfaces
//!
//! A `PixelBuffer` is a read-only width x height grid of RGBA pixels,
//! produced once per image by a `Surface` snapshot. The rasterizer only
//! ever reads from it.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A single RGBA pixel, channels 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The color channels without alpha
    pub fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Read-only RGBA pixel grid
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Build from raw interleaved RGBA bytes, row-major
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CoreError::Config(format!(
                "pixel data length {} does not match {}x{} RGBA ({expected} bytes)",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at (x, y); callers stay within bounds
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        debug_assert!(x < self.width && y < self.height);
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        Rgba::new(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        )
    }
}

/// Something the rasterizer can take a pixel snapshot of.
///
/// The surface owns the scaling: `snapshot` returns a buffer at exactly
/// the requested sample dimensions. Surfaces without pixel read-back
/// return `CoreError::UnsupportedSurface`.
pub trait Surface {
    /// Source dimensions in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Capture a scaled RGBA snapshot
    fn snapshot(&self, width: u32, height: u32) -> Result<PixelBuffer>;
}

/// Surface backed by a decoded image
pub struct ImageSurface {
    image: DynamicImage,
}

impl ImageSurface {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an image file into a surface
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(image::open(path)?))
    }
}

impl Surface for ImageSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    fn snapshot(&self, width: u32, height: u32) -> Result<PixelBuffer> {
        if width == 0 || height == 0 {
            return Ok(PixelBuffer::from_raw(0, 0, Vec::new())?);
        }
        let scaled = if (width, height) == self.dimensions() {
            self.image.to_rgba8()
        } else {
            self.image
                .resize_exact(width, height, FilterType::Triangle)
                .to_rgba8()
        };
        Ok(PixelBuffer::from_image(scaled))
    }
}
