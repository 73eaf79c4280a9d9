//! Edge-aligned column layout.
//!
//! Strong vertical structures (door hinges, frame edges) show up as large
//! jumps between neighbouring column intensity sums. The layout keeps the `k`
//! strongest jumps, at most one per block of `window` columns and one per
//! batch of `width / k` columns, then assumes the structures are evenly spaced:
//! the window width is the distance between the first two selected columns.
//!
//! This is a best-effort heuristic, not a guaranteed detector.
use super::{Splice, SplicePlan, SplicePlanner};
use crate::error::{PrepError, Result};
use crate::image::PixelImage;
use log::debug;

/// Columns per block; at most one candidate survives per block.
pub const DEFAULT_FEATURE_WINDOW: usize = 5;

/// (column index, absolute intensity difference to the previous column)
type Candidate = (usize, u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureLayout {
    /// Window height in rows.
    pub dim: usize,
    /// Number of features (column windows).
    pub k: usize,
    /// Block width in columns.
    pub window: usize,
}

impl FeatureLayout {
    pub fn new(dim: usize, k: usize) -> Self {
        Self {
            dim,
            k,
            window: DEFAULT_FEATURE_WINDOW,
        }
    }

    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Strongest `k` column edges, sorted by column index.
    pub fn select_features(&self, column_sums: &[u64]) -> Vec<Candidate> {
        let k = self.k;
        let window = self.window.max(1);
        let batch = (column_sums.len() / k.max(1)).max(1);

        let mut top: Vec<Candidate> = Vec::with_capacity(k);
        let mut block_best: Option<Candidate> = None;
        let mut batch_best: Option<Candidate> = None;

        for i in 1..column_sums.len() {
            let diff = column_sums[i].abs_diff(column_sums[i - 1]);
            if top.len() < k {
                top.push((i, diff));
            }
            keep_stronger(&mut block_best, (i, diff));

            if i % window == 0 {
                if let Some(candidate) = block_best.take() {
                    keep_stronger(&mut batch_best, candidate);
                }
            }
            if i % batch == 0 {
                if let Some(rep) = batch_best.take() {
                    offer(&mut top, rep);
                }
            }
        }
        // Trailing partial block and batch.
        if let Some(candidate) = block_best.take() {
            keep_stronger(&mut batch_best, candidate);
        }
        if let Some(rep) = batch_best.take() {
            offer(&mut top, rep);
        }

        top.sort_by_key(|&(index, _)| index);
        top
    }
}

/// Replace `slot` only when `candidate` is strictly stronger; ties keep the
/// earlier column.
fn keep_stronger(slot: &mut Option<Candidate>, candidate: Candidate) {
    if slot.is_none_or(|current| candidate.1 > current.1) {
        *slot = Some(candidate);
    }
}

/// Swap the weakest entry of `top` for `rep` when `rep` is stronger.
fn offer(top: &mut [Candidate], rep: Candidate) {
    if top.iter().any(|&(index, _)| index == rep.0) {
        return;
    }
    let weakest = top
        .iter()
        .enumerate()
        .min_by_key(|(_, candidate)| candidate.1)
        .map(|(slot, candidate)| (slot, candidate.1));
    if let Some((slot, magnitude)) = weakest {
        if magnitude < rep.1 {
            top[slot] = rep;
        }
    }
}

impl SplicePlanner for FeatureLayout {
    fn plan(&self, image: &PixelImage) -> Result<SplicePlan> {
        let (k, dim) = (self.k, self.dim);
        if k < 2 {
            return Err(PrepError::config(format!(
                "feature layout needs k >= 2, got {k}"
            )));
        }
        if dim == 0 || image.h % dim != 0 {
            return Err(PrepError::config(format!(
                "image height {} is not divisible by row dimension {dim}",
                image.h
            )));
        }
        if image.w <= k {
            return Err(PrepError::config(format!(
                "image width {} too small for {k} features",
                image.w
            )));
        }

        let column_sums: Vec<u64> = (0..image.w).map(|x| image.column_intensity(x)).collect();
        let features = self.select_features(&column_sums);
        debug!("feature layout: selected columns {features:?}");

        let start = features[0].0;
        let width = features[1].0 - features[0].0;
        if width == 0 {
            return Err(PrepError::config("feature layout produced a zero-width window"));
        }

        let end = start + k * width;
        if end > image.w {
            return Err(PrepError::config(format!(
                "{k} feature windows of width {width} from column {start} overrun image width {}",
                image.w
            )));
        }

        let mut splices = Vec::with_capacity(k * (image.h / dim));
        for c in (start..end).step_by(width) {
            for r in (0..image.h).step_by(dim) {
                splices.push(Splice::new(r..r + dim, c..c + width));
            }
        }
        let plan = SplicePlan::new(splices);
        plan.validate(image.w, image.h)?;
        Ok(plan)
    }
}
