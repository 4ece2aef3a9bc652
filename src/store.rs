//! Local config store: read and write configuration documents on disk.
//!
//! Writes replace the whole file. Parent directories are created as needed.

use std::path::{Path, PathBuf};

use crate::document::ConfigDocument;
use crate::error::SyncError;

/// Extensions accepted as-is on output file names.
const RECOGNIZED_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Serialize `document` to `path`, creating or truncating the file.
pub fn save(path: &Path, document: &ConfigDocument) -> Result<(), SyncError> {
    let content = document.to_yaml().map_err(SyncError::Serialize)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| SyncError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Parse the document stored at `path`.
pub fn load(path: &Path) -> Result<ConfigDocument, SyncError> {
    let content = std::fs::read_to_string(path).map_err(|e| SyncError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    ConfigDocument::from_yaml(&content).map_err(|e| SyncError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Append `.{default_extension}` unless the file name already ends in a
/// recognized extension (`yml`, `yaml`, or the default itself).
pub fn with_default_extension(path: &Path, default_extension: &str) -> PathBuf {
    let recognized = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            RECOGNIZED_EXTENSIONS
                .iter()
                .chain(std::iter::once(&default_extension))
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

    if recognized {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(default_extension);
    PathBuf::from(name)
}
