use crate::balance::BalanceParams;
use crate::dataset::SplitParams;
use crate::error::{PrepError, Result};
use crate::partition::PartitionParams;
use crate::splice::SpliceStrategy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct OutputConfig {
    /// Patch PNGs labeled anomalous; also receives the anomalous corpus file.
    pub anomalous_dir: PathBuf,
    /// Patch PNGs labeled normal; also receives the normal corpus file.
    pub normal_dir: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
    /// Traced reference masks, for inspection.
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub save_patches: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    /// Flat directory of PNG inspection images.
    pub input_dir: PathBuf,
    /// Keep only images of this subtype.
    #[serde(default)]
    pub subtype: Option<String>,
    /// Invert the subtype filter.
    #[serde(default)]
    pub leave_out: bool,
    pub strategies: Vec<SpliceStrategy>,
    #[serde(default)]
    pub partition: PartitionParams,
    #[serde(default)]
    pub balance: BalanceParams,
    #[serde(default)]
    pub split: SplitParams,
    pub output: OutputConfig,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(PrepError::config("at least one splice strategy is required"));
        }
        for strategy in &self.strategies {
            match *strategy {
                SpliceStrategy::Uniform { dim } if dim == 0 => {
                    return Err(PrepError::config("uniform splice dim must be positive"));
                }
                SpliceStrategy::Feature { dim, k, window } if dim == 0 || k < 2 || window == 0 => {
                    return Err(PrepError::config(format!(
                        "feature splice needs dim > 0, k >= 2, window > 0 (got dim {dim}, k {k}, window {window})"
                    )));
                }
                _ => {}
            }
        }
        if self.balance.ratio.contains(&0) {
            return Err(PrepError::config(format!(
                "balance ratio components must be positive, got {:?}",
                self.balance.ratio
            )));
        }
        self.partition.validate()
    }

    /// Name prefix for the corpus files.
    pub fn corpus_prefix(&self) -> &str {
        self.subtype.as_deref().unwrap_or("all")
    }
}

pub fn parse_config(json: &str) -> Result<RuntimeConfig> {
    let config: RuntimeConfig = serde_json::from_str(json)
        .map_err(|e| PrepError::config(format!("failed to parse config: {e}")))?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig> {
    let contents = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
    parse_config(&contents)
}
