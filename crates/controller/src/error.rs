use std::path::PathBuf;

use formats::DatasetError;
use foundation::math::ProjectionError;

/// Reported by the host when the dataset could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError(pub String);

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fetch failed: {}", self.0)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug)]
pub enum LoadError {
    Fetch(FetchError),
    Dataset(DatasetError),
    Projection(ProjectionError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Fetch(e) => write!(f, "{e}"),
            LoadError::Dataset(e) => write!(f, "dataset: {e}"),
            LoadError::Projection(e) => write!(f, "projection: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Fetch(e) => Some(e),
            LoadError::Dataset(e) => Some(e),
            LoadError::Projection(e) => Some(e),
        }
    }
}

impl From<FetchError> for LoadError {
    fn from(e: FetchError) -> Self {
        LoadError::Fetch(e)
    }
}

impl From<DatasetError> for LoadError {
    fn from(e: DatasetError) -> Self {
        LoadError::Dataset(e)
    }
}

impl From<ProjectionError> for LoadError {
    fn from(e: ProjectionError) -> Self {
        LoadError::Projection(e)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Json(String),
    Io { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Json(msg) => write!(f, "config JSON error: {msg}"),
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
