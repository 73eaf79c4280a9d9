//! Splice planning: which rectangles to cut from an image.
//!
//! A [`Splice`] is a pair of half-open ranges (rows, columns). A
//! [`SplicePlan`] is the ordered list produced by a [`SpliceStrategy`]:
//!
//! - `Uniform` tiles the image with non-overlapping `dim × dim` windows.
//! - `Feature` places `k` column windows at strong vertical intensity edges
//!   and tiles them vertically in steps of `dim`.
//!
//! New layouts are added as enum variants implementing [`SplicePlanner`].
mod feature;
mod uniform;

pub use feature::{FeatureLayout, DEFAULT_FEATURE_WINDOW};
pub use uniform::UniformGrid;

use crate::error::{PrepError, Result};
use crate::image::PixelImage;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Splice {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Splice {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    pub fn area(&self) -> usize {
        self.height() * self.width()
    }

    /// Empty or inverted in either axis.
    pub fn is_degenerate(&self) -> bool {
        self.rows.start >= self.rows.end || self.cols.start >= self.cols.end
    }

    pub fn fits(&self, width: usize, height: usize) -> bool {
        self.rows.end <= height && self.cols.end <= width
    }

    /// Block index of the splice along the rows, in units of its height.
    pub fn row_block(&self) -> usize {
        self.rows.start / self.height().max(1)
    }

    /// Block index of the splice along the columns, in units of its width.
    pub fn col_block(&self) -> usize {
        self.cols.start / self.width().max(1)
    }

    /// Error unless the splice is non-empty and inside `width × height`.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if self.is_degenerate() {
            return Err(PrepError::config(format!(
                "degenerate splice rows {:?} cols {:?}",
                self.rows, self.cols
            )));
        }
        if !self.fits(width, height) {
            return Err(PrepError::config(format!(
                "splice rows {:?} cols {:?} exceeds {width}x{height}",
                self.rows, self.cols
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplicePlan {
    pub splices: Vec<Splice>,
}

impl SplicePlan {
    pub fn new(splices: Vec<Splice>) -> Self {
        Self { splices }
    }

    pub fn len(&self) -> usize {
        self.splices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Splice> {
        self.splices.iter()
    }

    /// Check every splice against an image of `width × height`.
    pub fn validate(&self, width: usize, height: usize) -> Result<()> {
        if self.splices.is_empty() {
            return Err(PrepError::config("empty splice plan"));
        }
        self.splices
            .iter()
            .try_for_each(|splice| splice.validate(width, height))
    }
}

impl<'a> IntoIterator for &'a SplicePlan {
    type Item = &'a Splice;
    type IntoIter = std::slice::Iter<'a, Splice>;

    fn into_iter(self) -> Self::IntoIter {
        self.splices.iter()
    }
}

/// Computes a splice plan for an image.
pub trait SplicePlanner {
    fn plan(&self, image: &PixelImage) -> Result<SplicePlan>;
}

/// Splice layout selected by configuration (`"mode"` in JSON).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SpliceStrategy {
    /// Non-overlapping `dim × dim` grid.
    #[serde(rename = "default")]
    Uniform { dim: usize },
    /// `k` edge-aligned column windows, `dim` rows high.
    Feature {
        dim: usize,
        k: usize,
        #[serde(default = "default_feature_window")]
        window: usize,
    },
}

fn default_feature_window() -> usize {
    DEFAULT_FEATURE_WINDOW
}

impl SpliceStrategy {
    pub fn label(&self) -> String {
        match self {
            SpliceStrategy::Uniform { dim } => format!("default-{dim}"),
            SpliceStrategy::Feature { dim, k, .. } => format!("feature-{dim}-k{k}"),
        }
    }
}

impl SplicePlanner for SpliceStrategy {
    fn plan(&self, image: &PixelImage) -> Result<SplicePlan> {
        match *self {
            SpliceStrategy::Uniform { dim } => UniformGrid::new(dim).plan(image),
            SpliceStrategy::Feature { dim, k, window } => {
                FeatureLayout::new(dim, k).with_window(window).plan(image)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_json_uses_mode_tag() {
        let uniform: SpliceStrategy = serde_json::from_str(r#"{"mode":"default","dim":64}"#).unwrap();
        assert_eq!(uniform, SpliceStrategy::Uniform { dim: 64 });

        let feature: SpliceStrategy =
            serde_json::from_str(r#"{"mode":"feature","dim":64,"k":4}"#).unwrap();
        assert_eq!(
            feature,
            SpliceStrategy::Feature {
                dim: 64,
                k: 4,
                window: DEFAULT_FEATURE_WINDOW
            }
        );
    }

    #[test]
    fn splice_validation() {
        assert!(Splice::new(0..4, 0..4).validate(4, 4).is_ok());
        assert!(Splice::new(0..5, 0..4).validate(4, 4).is_err());
        assert!(Splice::new(2..2, 0..4).validate(4, 4).is_err());
        let inverted = Splice {
            rows: 3..1,
            cols: 0..1,
        };
        assert!(inverted.validate(4, 4).is_err());
        assert!(SplicePlan::default().validate(4, 4).is_err());
    }

    #[test]
    fn block_indices() {
        let splice = Splice::new(8..12, 4..8);
        assert_eq!((splice.row_block(), splice.col_block()), (2, 1));
    }
}
