//! Error types for `cover-load`.

use std::path::PathBuf;

use thiserror::Error;

use cover_ingest::IngestError;
use cover_map::MapError;
use cover_store::StoreError;

/// Errors that abort a whole run or a single file's load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Map(#[from] MapError),
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
