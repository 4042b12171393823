use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record {index} not found, store holds {len} records")]
    NotFound { index: usize, len: usize },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed record file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown export encoding: {0}")]
    UnknownEncoding(String),

    #[error("UTC offset of {0} hours is out of range")]
    InvalidOffset(i32),
}
