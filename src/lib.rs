//! Labeled anomaly patches from product-inspection photographs.
//!
//! Large images are cut into patches on a uniform grid or an edge-aligned
//! layout, mostly-black patches are dropped, and each remaining patch is
//! labeled anomalous or normal against a mask traced from the scene's
//! anomaly-only exemplar.

// Public modules (stable-ish surface)
pub mod catalog;
pub mod config;
pub mod error;
pub mod image;
pub mod pipeline;

// Stage modules, usable on their own.
pub mod balance;
pub mod dataset;
pub mod diagnostics;
pub mod export;
pub mod partition;
pub mod reference;
pub mod splice;

// --- High-level re-exports -------------------------------------------------

pub use crate::catalog::{extract_tag, ImageCatalog, ImageRecord};
pub use crate::error::{PrepError, Result};
pub use crate::pipeline::{DatasetPreparer, PreparedDataset};

pub use crate::partition::{Label, LabeledCorpus, PartitionParams, Partitioner, Patch};
pub use crate::reference::ReferenceSet;
pub use crate::splice::{Splice, SplicePlan, SplicePlanner, SpliceStrategy};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use anomaly_patches::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> anomaly_patches::Result<()> {
/// let dir = Path::new("images");
/// let catalog = ImageCatalog::from_dir(dir)?.filter_subtype("Apples", false)?;
/// let references = ReferenceSet::build(dir, &catalog, 5);
///
/// let layout = catalog.reference_image().expect("a full image");
/// let image = anomaly_patches::image::io::load_image(dir, &layout.name)?;
/// let plans = vec![SpliceStrategy::Uniform { dim: 64 }.plan(&image)?];
///
/// let outcome = Partitioner::new(PartitionParams::default(), &references, &plans)
///     .run(dir, &catalog);
/// let corpus = outcome.into_corpus();
/// println!("normal={} anomalous={}", corpus.normal.len(), corpus.anomalous.len());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::PixelImage;
    pub use crate::{
        ImageCatalog, Label, PartitionParams, Partitioner, ReferenceSet, SplicePlanner,
        SpliceStrategy,
    };
}
