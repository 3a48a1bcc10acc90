use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::dataset::{BoundaryDataset, DatasetError};

#[derive(Debug)]
pub enum DatasetLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: DatasetError,
    },
}

impl std::fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::Io { path, source } => {
                write!(f, "failed to read dataset {}: {source}", path.display())
            }
            DatasetLoadError::Parse { path, source } => {
                write!(f, "failed to parse dataset {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetLoadError {}

/// Reads a boundary dataset from disk (CLI and tests; the browser fetches it).
pub fn load_dataset_file(
    path: impl AsRef<Path>,
    name_property: &str,
) -> Result<BoundaryDataset, DatasetLoadError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|source| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = BoundaryDataset::from_geojson_str(&payload, name_property).map_err(|source| {
        DatasetLoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
    })?;
    info!(
        path = %path.display(),
        features = dataset.len(),
        skipped = dataset.skipped.len(),
        "loaded boundary dataset"
    );
    Ok(dataset)
}
