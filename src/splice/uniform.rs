use super::{Splice, SplicePlan, SplicePlanner};
use crate::error::{PrepError, Result};
use crate::image::PixelImage;

/// Non-overlapping `dim × dim` tiling, row-major.
///
/// Both image dimensions must be multiples of `dim`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UniformGrid {
    pub dim: usize,
}

impl UniformGrid {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn plan_for(&self, width: usize, height: usize) -> Result<SplicePlan> {
        let dim = self.dim;
        if dim == 0 {
            return Err(PrepError::config("splice dimension must be positive"));
        }
        if height == 0 || width == 0 || height % dim != 0 || width % dim != 0 {
            return Err(PrepError::config(format!(
                "dim {dim} does not evenly divide image dimensions {height}x{width}"
            )));
        }
        let splices = (0..height)
            .step_by(dim)
            .flat_map(|r| {
                (0..width)
                    .step_by(dim)
                    .map(move |c| Splice::new(r..r + dim, c..c + dim))
            })
            .collect();
        Ok(SplicePlan::new(splices))
    }
}

impl SplicePlanner for UniformGrid {
    fn plan(&self, image: &PixelImage) -> Result<SplicePlan> {
        self.plan_for(image.w, image.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_without_gaps_or_overlap() {
        let (w, h, dim) = (12, 8, 4);
        let plan = UniformGrid::new(dim).plan_for(w, h).unwrap();
        assert_eq!(plan.len(), 6);

        let mut hits = vec![0u8; w * h];
        for splice in &plan {
            assert_eq!((splice.height(), splice.width()), (dim, dim));
            for y in splice.rows.clone() {
                for x in splice.cols.clone() {
                    hits[y * w + x] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&n| n == 1));
    }

    #[test]
    fn rejects_dimension_that_does_not_divide() {
        assert!(UniformGrid::new(3).plan_for(9, 8).is_err());
        assert!(UniformGrid::new(4).plan_for(10, 8).is_err());
        assert!(UniformGrid::new(0).plan_for(8, 8).is_err());
    }
}
