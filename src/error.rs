use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("package manager agreement not accepted")]
    AgreementRequired,
    #[error("package does not exist in repo: {name}")]
    PackageNotFound { name: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("catalog url '{url}' is not a valid URL: {reason}")]
    InvalidCatalogUrl { url: String, reason: String },
    #[error("catalog url '{url}' does not contain the {{packageName}} placeholder")]
    MissingPlaceholder { url: String },
    #[error("no catalog url configured, cannot query package information")]
    NoCatalog,
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Storage failures, classified by the storage layer itself.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
