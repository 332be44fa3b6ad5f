// 💾 Dataset Store - Load and save the JSON data file
// The file is read whole and written whole; a save replaces the destination atomically

use crate::error::{SantaError, SantaResult};
use crate::model::Dataset;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a dataset. History comes back newest first regardless of file order.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> SantaResult<Dataset> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SantaError::NotFound {
            path: absolute(path),
        },
        _ => SantaError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let mut dataset: Dataset = serde_json::from_str(&content).map_err(|source| SantaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    dataset.sort_history();

    debug!(
        path = %path.display(),
        adults = dataset.adults.len(),
        kids = dataset.kids.len(),
        families = dataset.families.len(),
        years = dataset.history.len(),
        "dataset loaded"
    );

    Ok(dataset)
}

/// Write a dataset, replacing `path`.
///
/// The document goes to a sibling temporary file first and is renamed into
/// place, so a failed write leaves the previous file untouched.
pub fn save_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> SantaResult<()> {
    let path = path.as_ref();
    let tmp = temporary_sibling(path);

    let json =
        serde_json::to_string_pretty(dataset).map_err(|source| encode_error(path, source))?;

    fs::write(&tmp, json).map_err(|source| SantaError::Io {
        path: tmp.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(SantaError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    debug!(path = %path.display(), years = dataset.history.len(), "dataset saved");
    Ok(())
}

/// Saving only ever fails as a write failure, even when encoding is what broke
fn encode_error(path: &Path, source: serde_json::Error) -> SantaError {
    SantaError::Io {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

// ============================================================================
// TESTS
// ============================================================================
