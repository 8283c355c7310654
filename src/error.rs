use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("404 Not Found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to parse page: {0}")]
    Parse(String),

    #[error("failed to write {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Coarse failure classes used when reporting a skipped entry or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    TransportFailure,
    ParseFailure,
    PersistenceFailure,
}

impl HarvestError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HarvestError::NotFound { .. } => FailureKind::NotFound,
            HarvestError::HttpStatus { .. } | HarvestError::Transport { .. } => {
                FailureKind::TransportFailure
            }
            HarvestError::Parse(_) | HarvestError::Json(_) | HarvestError::InvalidCatalog(_) => {
                FailureKind::ParseFailure
            }
            HarvestError::Persistence { .. } | HarvestError::Io(_) => {
                FailureKind::PersistenceFailure
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
