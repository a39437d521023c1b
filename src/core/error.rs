use crate::core::codec::DecodeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GozelleError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corrupt store {}: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Index out of range: {index} (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Missing dependency: {0}")]
    MissingDependency(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GozelleError {
    /// Wraps an `io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
