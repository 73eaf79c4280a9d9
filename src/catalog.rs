//! Filename records for a flat image directory.
//!
//! Filenames encode metadata in underscore-delimited segments: the second
//! segment is the subtype, one segment is the scene tag (a letter followed by
//! two digits, e.g. `p03`), and anomaly-only exemplars carry the literal
//! marker [`EXEMPLAR_MARKER`].
use crate::error::{PrepError, Result};
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const EXEMPLAR_MARKER: &str = "anomaly_only_view";

/// Subtypes accepted by [`ImageCatalog::filter_subtype`].
pub const KNOWN_SUBTYPES: [&str; 11] = [
    "Shirts",
    "Paper",
    "Laptops",
    "Cans",
    "Bananas",
    "Shoes",
    "Apples",
    "Tires",
    "AnomalyAbsent",
    "200",
    "750",
];

/// Scene tag of a filename, if any segment is a letter followed by two digits.
///
/// The extension is stripped first so a trailing tag segment still matches.
pub fn extract_tag(name: &str) -> Option<&str> {
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    };
    stem.split('_').find(|segment| is_tag(segment))
}

fn is_tag(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_digit()
}

/// True for anomaly-only exemplar images.
pub fn is_exemplar(name: &str) -> bool {
    name.contains(EXEMPLAR_MARKER)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Position in the original directory listing
    pub index: usize,
    pub name: String,
}

impl ImageRecord {
    pub fn tag(&self) -> Option<&str> {
        extract_tag(&self.name)
    }

    pub fn is_exemplar(&self) -> bool {
        is_exemplar(&self.name)
    }
}

/// Ordered list of image filenames.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImageCatalog {
    records: Vec<ImageRecord>,
}

impl ImageCatalog {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| ImageRecord {
                index,
                name: name.into(),
            })
            .collect();
        Self { records }
    }

    /// List the `.png` files of `dir` in name order.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| PrepError::io(dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.to_ascii_lowercase().ends_with(".png"))
            .collect();
        names.sort();
        debug!("catalog: {} png files in {}", names.len(), dir.display());
        Ok(Self::from_names(names))
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct subtype segments (second underscore segment), sorted.
    pub fn subtypes(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|r| r.name.split('_').nth(1))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Keep names containing `subtype` (case-insensitive); with `leave_out`,
    /// keep the others instead. Record indices are preserved.
    pub fn filter_subtype(&self, subtype: &str, leave_out: bool) -> Result<Self> {
        if !KNOWN_SUBTYPES.contains(&subtype) {
            return Err(PrepError::config(format!(
                "unknown subtype {subtype:?}; expected one of {KNOWN_SUBTYPES:?}"
            )));
        }
        let needle = subtype.to_ascii_lowercase();
        let records = self
            .records
            .iter()
            .filter(|r| r.name.to_ascii_lowercase().contains(&needle) != leave_out)
            .cloned()
            .collect();
        Ok(Self { records })
    }

    /// First full (non-exemplar) image; used as the layout reference.
    pub fn reference_image(&self) -> Option<&ImageRecord> {
        self.records.iter().find(|r| !r.is_exemplar())
    }

    /// First exemplar carrying `tag`.
    pub fn exemplar_for(&self, tag: &str) -> Option<&ImageRecord> {
        self.records
            .iter()
            .find(|r| r.is_exemplar() && r.tag() == Some(tag))
    }

    /// Distinct tags in first-seen order.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter_map(ImageRecord::tag)
            .filter(|tag| seen.insert(*tag))
            .collect()
    }
}
