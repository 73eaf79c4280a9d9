use super::TimingBreakdown;
use crate::partition::{LabeledCorpus, SkippedImage};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCounts {
    pub normal: usize,
    pub anomalous: usize,
}

impl ClassCounts {
    pub fn of(corpus: &LabeledCorpus) -> Self {
        Self {
            normal: corpus.normal.len(),
            anomalous: corpus.anomalous.len(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSummary {
    pub tag: String,
    pub anomalous_pixels: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySummary {
    pub label: String,
    pub splice_count: usize,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationReport {
    pub subtype: Option<String>,
    pub layout_image: Option<String>,
    pub images_listed: usize,
    pub images_partitioned: usize,
    pub references: Vec<ReferenceSummary>,
    pub strategies: Vec<StrategySummary>,
    pub skipped: Vec<SkippedImage>,
    pub patches: ClassCounts,
    pub balanced: ClassCounts,
    pub patch_images_written: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub timings: TimingBreakdown,
}
