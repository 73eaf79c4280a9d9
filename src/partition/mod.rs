//! Patch extraction and labeling.
//!
//! For every full (non-exemplar) image with a resolvable tag the partitioner
//! applies each splice plan, drops patches that are mostly background, and
//! labels the rest against the tag's reference mask.
//!
//! Images are decoded one at a time. Per-image failures (decode errors, a
//! missing reference, a plan that does not fit) skip that image and are
//! recorded in [`PartitionOutcome::skipped`]; the batch continues.
mod filter;
mod label;

pub use filter::{background_ratio, keep_patch};
pub use label::{anomaly_ratio, label_for, Label};

use crate::catalog::{ImageCatalog, ImageRecord};
use crate::error::{PrepError, Result};
use crate::image::io::load_image;
use crate::image::PixelImage;
use crate::reference::{ReferenceSet, DEFAULT_MIN_PIXEL};
use crate::splice::{Splice, SplicePlan};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Thresholds applied to every candidate patch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionParams {
    /// Patches with a background ratio at or above this are dropped.
    pub background_threshold: f64,
    /// A color channel must exceed this to count as non-background.
    pub min_pixel: u8,
    /// Patches whose anomaly ratio exceeds this are labeled anomalous.
    pub anomaly_threshold: f64,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            background_threshold: 0.80,
            min_pixel: DEFAULT_MIN_PIXEL,
            anomaly_threshold: 0.10,
        }
    }
}

impl PartitionParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("background_threshold", self.background_threshold),
            ("anomaly_threshold", self.anomaly_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PrepError::config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One labeled training example cut from a source image.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Source image filename
    pub name: String,
    /// Index of the plan (strategy) that produced the splice
    pub plan: usize,
    pub splice: Splice,
    /// RGB pixels of the splice
    pub pixels: PixelImage,
    pub label: Label,
}

/// Patches cut from a single image, in plan order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePatches {
    pub index: usize,
    pub name: String,
    pub patches: Vec<Patch>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "detail")]
pub enum SkipReason {
    NoTag,
    Exemplar,
    MissingReference(String),
    Decode(String),
    Configuration(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub name: String,
    pub reason: SkipReason,
}

/// Result of partitioning a catalog.
#[derive(Clone, Debug, Default)]
pub struct PartitionOutcome {
    pub images: Vec<ImagePatches>,
    pub skipped: Vec<SkippedImage>,
}

impl PartitionOutcome {
    pub fn patch_count(&self) -> usize {
        self.images.iter().map(|group| group.patches.len()).sum()
    }

    /// Split every patch by label, dropping the per-image grouping.
    pub fn into_corpus(self) -> LabeledCorpus {
        let mut corpus = LabeledCorpus::default();
        for patch in self.images.into_iter().flat_map(|group| group.patches) {
            corpus.push(patch);
        }
        corpus
    }
}

/// Patches split by label.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabeledCorpus {
    pub normal: Vec<Patch>,
    pub anomalous: Vec<Patch>,
}

impl LabeledCorpus {
    pub fn push(&mut self, patch: Patch) {
        match patch.label {
            Label::Normal => self.normal.push(patch),
            Label::Anomalous => self.anomalous.push(patch),
        }
    }

    pub fn get(&self, label: Label) -> &[Patch] {
        match label {
            Label::Normal => &self.normal,
            Label::Anomalous => &self.anomalous,
        }
    }

    pub fn len(&self) -> usize {
        self.normal.len() + self.anomalous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies splice plans to images and labels the kept patches.
///
/// Reference masks must be fully built before partitioning starts.
pub struct Partitioner<'a> {
    params: PartitionParams,
    references: &'a ReferenceSet,
    plans: &'a [SplicePlan],
}

impl<'a> Partitioner<'a> {
    pub fn new(params: PartitionParams, references: &'a ReferenceSet, plans: &'a [SplicePlan]) -> Self {
        Self {
            params,
            references,
            plans,
        }
    }

    /// Partition every image of `catalog`, decoding from `dir`.
    pub fn run(&self, dir: &Path, catalog: &ImageCatalog) -> PartitionOutcome {
        self.run_with(catalog, |record| load_image(dir, &record.name))
    }

    /// Like [`Partitioner::run`] with a caller-supplied image source.
    pub fn run_with<F>(&self, catalog: &ImageCatalog, mut load: F) -> PartitionOutcome
    where
        F: FnMut(&ImageRecord) -> Result<PixelImage>,
    {
        let mut outcome = PartitionOutcome::default();
        for record in catalog.iter() {
            match self.process_record(record, &mut load) {
                Ok(patches) => {
                    debug!("partition: {} -> {} patches", record.name, patches.len());
                    outcome.images.push(ImagePatches {
                        index: record.index,
                        name: record.name.clone(),
                        patches,
                    });
                }
                Err(reason) => {
                    match &reason {
                        SkipReason::NoTag | SkipReason::Exemplar => {
                            debug!("partition: skipping {} ({reason:?})", record.name)
                        }
                        _ => warn!("partition: skipping {}: {reason:?}", record.name),
                    }
                    outcome.skipped.push(SkippedImage {
                        name: record.name.clone(),
                        reason,
                    });
                }
            }
        }
        info!(
            "partition: {} patches from {} images, {} skipped",
            outcome.patch_count(),
            outcome.images.len(),
            outcome.skipped.len()
        );
        outcome
    }

    fn process_record<F>(
        &self,
        record: &ImageRecord,
        load: &mut F,
    ) -> std::result::Result<Vec<Patch>, SkipReason>
    where
        F: FnMut(&ImageRecord) -> Result<PixelImage>,
    {
        if record.is_exemplar() {
            return Err(SkipReason::Exemplar);
        }
        if record.tag().is_none() {
            return Err(SkipReason::NoTag);
        }
        let image = load(record).map_err(|err| SkipReason::Decode(err.to_string()))?;
        self.partition_image(&record.name, &image).map_err(|err| match err {
            PrepError::MissingReference(tag) => SkipReason::MissingReference(tag),
            other => SkipReason::Configuration(other.to_string()),
        })
    }

    /// Labeled patches of one image, in plan order.
    ///
    /// Every plan is validated against the image and its mask before any
    /// patch is produced.
    pub fn partition_image(&self, name: &str, image: &PixelImage) -> Result<Vec<Patch>> {
        let tag = crate::catalog::extract_tag(name)
            .ok_or_else(|| PrepError::config(format!("no tag in {name}")))?;
        let mask = self.references.require(tag)?;
        for plan in self.plans {
            plan.validate(image.w, image.h)?;
            plan.validate(mask.w, mask.h)?;
        }

        let params = &self.params;
        let patches = self
            .plans
            .iter()
            .enumerate()
            .flat_map(|(plan_index, plan)| plan.iter().map(move |splice| (plan_index, splice)))
            .filter(|(_, splice)| keep_patch(image, splice, params.min_pixel, params.background_threshold))
            .map(|(plan_index, splice)| {
                let ratio = anomaly_ratio(mask, splice);
                Patch {
                    name: name.to_string(),
                    plan: plan_index,
                    splice: splice.clone(),
                    pixels: image.crop_rgb(splice.rows.clone(), splice.cols.clone()),
                    label: label_for(ratio, params.anomaly_threshold),
                }
            })
            .collect();
        Ok(patches)
    }
}

#[cfg(test)]
mod tests;
