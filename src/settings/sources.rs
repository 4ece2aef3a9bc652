//! Settings sources: file discovery and environment variables.
//!
//! Each [`SearchPath`] resolves to one directory; `{dir}/beanstalker.toml` is
//! read when present. Missing files and unresolvable paths are skipped; other
//! I/O errors are returned.

use std::path::PathBuf;

use toml::{Table, Value};

use crate::error::SyncError;
use crate::types::SearchPath;

/// Application name used for the platform config directory.
const APP_NAME: &str = "beanstalker";

/// Resolve a [`SearchPath`] to a directory, or `None` when the platform
/// cannot provide one (e.g. no home directory).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", APP_NAME)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Read every existing settings file, lowest priority first.
pub fn load_settings_files(
    search_paths: &[SearchPath],
    file_name: &str,
) -> Result<Vec<(PathBuf, String)>, SyncError> {
    let mut found = Vec::new();
    for dir in search_paths.iter().filter_map(resolve_search_path) {
        let file_path = dir.join(file_name);
        match std::fs::read_to_string(&file_path) {
            Ok(content) => found.push((file_path, content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(SyncError::Io {
                    path: file_path,
                    source: e,
                });
            }
        }
    }
    Ok(found)
}

/// Collect `{PREFIX}__KEY=value` variables into a table of lowercased keys.
///
/// Settings are flat, so anything after the prefix is one key. Values stay
/// strings.
pub fn env_to_table(prefix: &str, vars: impl IntoIterator<Item = (String, String)>) -> Table {
    let needle = format!("{prefix}__");
    vars.into_iter()
        .filter_map(|(key, value)| {
            let rest = key.strip_prefix(&needle)?;
            (!rest.is_empty()).then(|| (rest.to_lowercase(), Value::String(value)))
        })
        .collect()
}
