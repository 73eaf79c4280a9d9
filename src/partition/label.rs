use crate::image::BinaryMask;
use crate::splice::Splice;
use serde::{Deserialize, Serialize};

/// Binary patch class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Normal = 0,
    Anomalous = 1,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<Label> for u8 {
    fn from(label: Label) -> u8 {
        label.as_u8()
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Fraction of mask pixels inside the splice that are set.
pub fn anomaly_ratio(mask: &BinaryMask, splice: &Splice) -> f64 {
    mask.count_in(splice.rows.clone(), splice.cols.clone()) as f64 / splice.area() as f64
}

/// Anomalous iff `ratio` strictly exceeds `threshold`.
pub fn label_for(ratio: f64, threshold: f64) -> Label {
    if ratio > threshold {
        Label::Anomalous
    } else {
        Label::Normal
    }
}
