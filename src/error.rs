use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    /// The relationship dataset could not be opened or decompressed.
    #[error("dataset {} unavailable: {source}", path.display())]
    DatasetUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl TopologyError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TopologyError::DatasetUnavailable {
            path: path.into(),
            source,
        }
    }
}
