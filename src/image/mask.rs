//! Binary 0/1 mask with the row/column extent of its source image.
use super::traits::ImageView;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMask {
    pub w: usize,
    pub h: usize,
    /// One byte per pixel, 0 or 1
    pub data: Vec<u8>,
}

impl BinaryMask {
    /// All-zero mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[self.idx(x, y)] != 0
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize) {
        let i = self.idx(x, y);
        self.data[i] = 1;
    }

    pub fn count_ones(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Number of set pixels inside the rectangle.
    pub fn count_in(&self, rows: Range<usize>, cols: Range<usize>) -> usize {
        rows.map(|y| {
            let start = self.idx(cols.start, y);
            self.data[start..start + cols.len()]
                .iter()
                .filter(|&&v| v != 0)
                .count()
        })
        .sum()
    }
}

impl ImageView for BinaryMask {
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
        1
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
