//! Error type shared by every preparation stage.
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PrepError>;

#[derive(Debug, Error)]
pub enum PrepError {
    /// Image file missing, corrupt, or in an unsupported format.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// Parameters incompatible with the image, or producing degenerate ranges.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// No anomaly-only exemplar was found for the tag.
    #[error("no anomaly reference for tag {0}")]
    MissingReference(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode corpus: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("failed to decode corpus: {0}")]
    DecodeCorpus(#[from] bincode::error::DecodeError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrepError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PrepError::Configuration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepError::Io {
            path: path.into(),
            source,
        }
    }
}
