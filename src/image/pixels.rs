//! Owned multi-channel u8 image in interleaved row-major layout.
//!
//! The first three channels are treated as color; a fourth, when present, is
//! alpha and is ignored by every intensity test in the pipeline.
use super::traits::ImageView;
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Number of color channels considered by intensity tests.
pub const COLOR_CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelImage {
    /// Image width in pixels
    pub w: usize,
    /// Image height in pixels
    pub h: usize,
    /// Samples per pixel: 3 (RGB) or 4 (RGBA)
    pub channels: usize,
    /// Backing storage, `w * h * channels` samples
    pub data: Vec<u8>,
}

impl PixelImage {
    /// Zero-initialized (black) image.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![0; w * h * channels],
        }
    }

    /// Wrap raw interleaved samples, checking the layout.
    pub fn from_raw(w: usize, h: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if !(COLOR_CHANNELS..=COLOR_CHANNELS + 1).contains(&channels) {
            return Err(PrepError::config(format!(
                "expected 3 or 4 channels, got {channels}"
            )));
        }
        if data.len() != w * h * channels {
            return Err(PrepError::config(format!(
                "buffer of {} samples does not match {w}x{h}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        (y * self.w + x) * self.channels
    }

    /// Color samples of the pixel at (x, y), alpha excluded.
    #[inline]
    pub fn color(&self, x: usize, y: usize) -> &[u8] {
        let i = self.idx(x, y);
        &self.data[i..i + COLOR_CHANNELS]
    }

    #[inline]
    pub fn set_color(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = self.idx(x, y);
        self.data[i..i + COLOR_CHANNELS].copy_from_slice(&rgb);
    }

    /// True when every color channel exceeds `min_pixel`.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize, min_pixel: u8) -> bool {
        self.color(x, y).iter().all(|&v| v > min_pixel)
    }

    /// Sum of color samples in column `x`.
    pub fn column_intensity(&self, x: usize) -> u64 {
        (0..self.h)
            .map(|y| self.color(x, y).iter().map(|&v| u64::from(v)).sum::<u64>())
            .sum()
    }

    /// Copy of the sub-region as an RGB image.
    ///
    /// Callers validate the ranges against the image bounds first.
    pub fn crop_rgb(&self, rows: Range<usize>, cols: Range<usize>) -> PixelImage {
        let w = cols.len();
        let h = rows.len();
        let mut data = Vec::with_capacity(w * h * COLOR_CHANNELS);
        for y in rows {
            for x in cols.clone() {
                data.extend_from_slice(self.color(x, y));
            }
        }
        PixelImage {
            w,
            h,
            channels: COLOR_CHANNELS,
            data,
        }
    }

    /// Drop the alpha channel if present.
    pub fn into_rgb(self) -> PixelImage {
        if self.channels == COLOR_CHANNELS {
            return self;
        }
        self.crop_rgb(0..self.h, 0..self.w)
    }
}

impl ImageView for PixelImage {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w * self.channels;
        &self.data[start..start + self.w * self.channels]
    }
}
