//! Anomaly reference masks, one per scene tag.
//!
//! Each tag group is expected to contain an anomaly-only exemplar: a photo of
//! the scene where everything except the anomaly is black. Tracing the lit
//! pixels of that exemplar yields the mask used to label patches of every
//! other image sharing the tag.
//!
//! Masks are built once per preparation run, before any image is partitioned,
//! and are read-only afterwards.
mod trace;

pub use trace::trace_mask;

use crate::catalog::{ImageCatalog, ImageRecord};
use crate::error::{PrepError, Result};
use crate::image::io::load_image;
use crate::image::{BinaryMask, PixelImage};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Default minimum intensity for a color channel to count as non-background.
pub const DEFAULT_MIN_PIXEL: u8 = 5;

/// Tag → traced mask.
#[derive(Clone, Debug, Default)]
pub struct ReferenceSet {
    masks: BTreeMap<String, BinaryMask>,
}

impl ReferenceSet {
    /// Build masks for every tag in `catalog`, decoding exemplars from `dir`.
    pub fn build(dir: &Path, catalog: &ImageCatalog, min_pixel: u8) -> Self {
        Self::build_with(catalog, min_pixel, |record| load_image(dir, &record.name))
    }

    /// Like [`ReferenceSet::build`] with a caller-supplied image source.
    ///
    /// Tags without an exemplar, or whose exemplar fails to load, are left
    /// out; callers see them as [`PrepError::MissingReference`].
    pub fn build_with<F>(catalog: &ImageCatalog, min_pixel: u8, mut load: F) -> Self
    where
        F: FnMut(&ImageRecord) -> Result<PixelImage>,
    {
        let mut masks = BTreeMap::new();
        for tag in catalog.tags() {
            let Some(exemplar) = catalog.exemplar_for(tag) else {
                debug!("reference: no exemplar for tag {tag}");
                continue;
            };
            let image = match load(exemplar) {
                Ok(image) => image.into_rgb(),
                Err(err) => {
                    warn!("reference: skipping tag {tag}: {err}");
                    continue;
                }
            };
            let mask = trace_mask(&image, min_pixel);
            debug!(
                "reference: tag {tag} from {} -> {} anomalous pixels",
                exemplar.name,
                mask.count_ones()
            );
            masks.insert(tag.to_string(), mask);
        }
        Self { masks }
    }

    pub fn from_masks(masks: impl IntoIterator<Item = (String, BinaryMask)>) -> Self {
        Self {
            masks: masks.into_iter().collect(),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&BinaryMask> {
        self.masks.get(tag)
    }

    pub fn require(&self, tag: &str) -> Result<&BinaryMask> {
        self.get(tag)
            .ok_or_else(|| PrepError::MissingReference(tag.to_string()))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.masks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}
