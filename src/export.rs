//! Persisting prepared patches.
//!
//! - `save_patches`: one PNG per patch under the directory of its class.
//! - `save_corpus` / `load_corpus`: one binary file per class for the
//!   training step.
//!
//! Files are written one at a time, so an interrupted run leaves a prefix of
//! complete files behind.
use crate::error::{PrepError, Result};
use crate::image::io::{ensure_parent_dir, save_rgb_png};
use crate::partition::{Label, Patch};
use bincode::config;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `<stem>_<plan>_<row block>_<col block>.png`
pub fn patch_file_name(patch: &Patch) -> String {
    let stem = Path::new(&patch.name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&patch.name);
    format!(
        "{stem}_{}_{}_{}.png",
        patch.plan,
        patch.splice.row_block(),
        patch.splice.col_block()
    )
}

/// Write every patch as a PNG into `anomalous_dir` or `normal_dir`.
pub fn save_patches<'a, I>(patches: I, anomalous_dir: &Path, normal_dir: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Patch>,
{
    let mut written = 0;
    for patch in patches {
        let dir = match patch.label {
            Label::Anomalous => anomalous_dir,
            Label::Normal => normal_dir,
        };
        save_rgb_png(&patch.pixels, &dir.join(patch_file_name(patch)))?;
        written += 1;
    }
    debug!("export: wrote {written} patch images");
    Ok(written)
}

/// On-disk form of one class of the corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusFile {
    pub label: Label,
    pub patches: Vec<Patch>,
}

/// `<subtype><label>.bin`, e.g. `Apples1.bin`.
pub fn corpus_file_name(subtype: &str, label: Label) -> String {
    format!("{subtype}{label}.bin")
}

pub fn corpus_path(dir: &Path, subtype: &str, label: Label) -> PathBuf {
    dir.join(corpus_file_name(subtype, label))
}

pub fn save_corpus(path: &Path, label: Label, patches: &[Patch]) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = CorpusFile {
        label,
        patches: patches.to_vec(),
    };
    let bytes = bincode::serde::encode_to_vec(&file, config::standard())?;
    fs::write(path, bytes).map_err(|e| PrepError::io(path, e))?;
    debug!(
        "export: {} patches labeled {label} -> {}",
        patches.len(),
        path.display()
    );
    Ok(())
}

pub fn load_corpus(path: &Path) -> Result<CorpusFile> {
    let bytes = fs::read(path).map_err(|e| PrepError::io(path, e))?;
    let (file, _): (CorpusFile, usize) =
        bincode::serde::decode_from_slice(&bytes, config::standard())?;
    Ok(file)
}
