//! Image Sampler
//!
//! Decodes a raster image once and exposes row-major RGB and grayscale pixel
//! buffers for the analyzers. Grayscale uses ITU-R 601-2 luma weights in
//! 16-bit fixed point, matching the usual `L` conversion of photo tooling.

use crate::errors::{ClassifyError, Result};
use image::{DynamicImage, ImageReader};
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SampledImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<[u8; 3]>,
    pub gray: Vec<u8>,
}

impl SampledImage {
    pub fn open(path: &Path) -> Result<Self> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Self::from_dynamic(&img)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Self::from_dynamic(&img)
    }

    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let rgb_image = img.to_rgb8();
        let (width, height) = rgb_image.dimensions();
        if width == 0 || height == 0 {
            return Err(ClassifyError::Decode(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let rgb: Vec<[u8; 3]> = rgb_image.pixels().map(|p| p.0).collect();
        let gray = rgb.iter().map(|&[r, g, b]| luma(r, g, b)).collect();

        Ok(Self {
            width,
            height,
            rgb,
            gray,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.gray.len()
    }

    #[inline]
    pub fn gray_at(&self, x: u32, y: u32) -> u8 {
        self.gray[(y as usize) * (self.width as usize) + x as usize]
    }
}

#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}
