//! End-to-end dataset preparation.
//!
//! Stages, in order:
//! 1. list and filter the input directory,
//! 2. trace one reference mask per tag,
//! 3. plan splices once per strategy on the layout image,
//! 4. partition and label every image,
//! 5. export patch PNGs and per-class corpus files,
//! 6. rebalance classes and build the train/test feature split.
use crate::balance::{balance, Balanced};
use crate::catalog::ImageCatalog;
use crate::config::RuntimeConfig;
use crate::dataset::FeatureSet;
use crate::diagnostics::{
    ClassCounts, PreparationReport, ReferenceSummary, StrategySummary, TimingBreakdown,
};
use crate::error::{PrepError, Result};
use crate::export::{corpus_path, save_corpus, save_patches};
use crate::image::io::{load_image, save_mask_png};
use crate::partition::{Label, LabeledCorpus, Partitioner, Patch};
use crate::reference::ReferenceSet;
use crate::splice::{SplicePlan, SplicePlanner};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Everything a preparation run produces.
pub struct PreparedDataset {
    pub corpus: LabeledCorpus,
    pub balanced: Balanced<Patch>,
    pub train: FeatureSet,
    pub test: FeatureSet,
    pub report: PreparationReport,
}

pub struct DatasetPreparer {
    config: RuntimeConfig,
}

impl DatasetPreparer {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn run(&self) -> Result<PreparedDataset> {
        let config = &self.config;
        config.validate()?;
        let mut timings = TimingBreakdown::default();
        let mut report = PreparationReport {
            subtype: config.subtype.clone(),
            ..Default::default()
        };

        let catalog = timings.measure("catalog", || self.catalog())?;
        report.images_listed = catalog.len();
        if catalog.is_empty() {
            return Err(PrepError::config(format!(
                "no images to prepare in {}",
                config.input_dir.display()
            )));
        }

        let references = timings.measure("references", || {
            ReferenceSet::build(&config.input_dir, &catalog, config.partition.min_pixel)
        });
        info!("prepared {} reference masks", references.len());
        report.references = references
            .tags()
            .filter_map(|tag| {
                references.get(tag).map(|mask| ReferenceSummary {
                    tag: tag.to_string(),
                    anomalous_pixels: mask.count_ones(),
                })
            })
            .collect();
        if let Some(dir) = &config.output.mask_dir {
            for tag in references.tags() {
                let mask = references.require(tag)?;
                save_mask_png(mask, &dir.join(format!("{tag}_mask.png")))?;
            }
        }

        let layout = catalog
            .reference_image()
            .ok_or_else(|| PrepError::config("no full image to plan splices on"))?;
        report.layout_image = Some(layout.name.clone());
        let plans = timings.measure("plan", || self.plan_splices(&layout.name))?;
        report.strategies = config
            .strategies
            .iter()
            .zip(&plans)
            .map(|(strategy, plan)| StrategySummary {
                label: strategy.label(),
                splice_count: plan.len(),
            })
            .collect();

        let partitioner = Partitioner::new(config.partition, &references, &plans);
        let outcome = timings.measure("partition", || partitioner.run(&config.input_dir, &catalog));
        report.images_partitioned = outcome.images.len();
        report.skipped = outcome.skipped.clone();
        let corpus = outcome.into_corpus();
        report.patches = ClassCounts::of(&corpus);

        timings.measure("export", || self.export(&corpus, &mut report))?;

        let mut rng = match config.balance.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let balanced = balance(
            corpus.normal.clone(),
            corpus.anomalous.clone(),
            config.balance.ratio,
            &mut rng,
        )?;
        report.balanced = ClassCounts {
            normal: balanced.normal.len(),
            anomalous: balanced.anomalous.len(),
        };

        let features = timings.measure("features", || {
            FeatureSet::from_patches(&balanced.normal, &balanced.anomalous)
        });
        let (train, test) = if features.is_empty() {
            (FeatureSet::default(), FeatureSet::default())
        } else {
            features.train_test_split(config.split)?
        };
        report.train_rows = train.len();
        report.test_rows = test.len();
        report.timings = timings;

        Ok(PreparedDataset {
            corpus,
            balanced,
            train,
            test,
            report,
        })
    }

    fn catalog(&self) -> Result<ImageCatalog> {
        let all = ImageCatalog::from_dir(&self.config.input_dir)?;
        match &self.config.subtype {
            Some(subtype) => all.filter_subtype(subtype, self.config.leave_out),
            None => Ok(all),
        }
    }

    /// One plan per strategy, computed on the layout image.
    fn plan_splices(&self, layout: &str) -> Result<Vec<SplicePlan>> {
        let image = load_image(&self.config.input_dir, layout)?;
        self.config
            .strategies
            .iter()
            .map(|strategy| -> Result<SplicePlan> {
                let plan = strategy.plan(&image)?;
                debug!("plan {}: {} splices", strategy.label(), plan.len());
                Ok(plan)
            })
            .collect()
    }

    fn export(&self, corpus: &LabeledCorpus, report: &mut PreparationReport) -> Result<()> {
        let output = &self.config.output;
        if output.save_patches {
            report.patch_images_written = save_patches(
                corpus.normal.iter().chain(&corpus.anomalous),
                &output.anomalous_dir,
                &output.normal_dir,
            )?;
        }
        let prefix = self.config.corpus_prefix();
        for (dir, label) in [
            (&output.normal_dir, Label::Normal),
            (&output.anomalous_dir, Label::Anomalous),
        ] {
            save_corpus(&corpus_path(dir, prefix, label), label, corpus.get(label))?;
        }
        Ok(())
    }
}
