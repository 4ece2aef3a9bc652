use std::path::PathBuf;

/// Where to search for the settings file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".beanstalker")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

/// A sync operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncAction {
    /// Fetch a live environment's config into a local file. Missing fields
    /// are asked for interactively.
    Get {
        application: Option<String>,
        environment_id: Option<String>,
        region: Option<String>,
        out_file: Option<PathBuf>,
    },
    /// Push a local file's config to the environment it names.
    Update {
        file: PathBuf,
        application: Option<String>,
        environment_id: Option<String>,
        region: Option<String>,
    },
}
