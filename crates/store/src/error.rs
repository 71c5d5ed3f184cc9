use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed store document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("bad value for key {key}: {value:?}")]
    BadValue { key: String, value: String },
    #[error("store unavailable")]
    Unavailable,
}
