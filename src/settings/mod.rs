//! Tool settings, resolved through layers.
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Settings files        beanstalker.toml in each search path, later paths win
//!        ↑ overridden by
//! Environment vars      BEANSTALKER__KEY
//!        ↑ overridden by
//! CLI flags             .cli_override()
//! ```
//!
//! Every layer is sparse. Unknown keys in a settings file are rejected with
//! their file and line unless strict mode is turned off.

mod resolve;
mod sources;

use confique::Config;

use crate::error::SyncError;
use crate::types::SearchPath;

use resolve::{ResolveInput, resolve};

/// Settings file name looked up in every search path.
pub const FILE_NAME: &str = "beanstalker.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "BEANSTALKER";

#[derive(Config, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Region used when `--region` is not given.
    pub region: Option<String>,

    /// Option namespace holding user-defined environment variables.
    #[config(default = "aws:elasticbeanstalk:application:environment")]
    pub namespace: String,

    /// Extension appended to output file names without a recognized one.
    #[config(default = "yml")]
    pub default_extension: String,

    /// Tracing filter used when `--verbose` is not given.
    #[config(default = "warn")]
    pub log_filter: String,
}

/// Builder that gathers settings sources and resolves them.
///
/// ```ignore
/// let settings = SettingsLoader::new()
///     .cli_override("region", cli.region.clone())
///     .load()?;
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    search_paths: Vec<SearchPath>,
    env_prefix: Option<String>,
    overrides: Vec<(String, String)>,
    strict: bool,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            search_paths: vec![
                SearchPath::Platform,
                SearchPath::Home(".beanstalker"),
                SearchPath::Cwd,
            ],
            env_prefix: Some(ENV_PREFIX.to_string()),
            overrides: Vec::new(),
            strict: true,
        }
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search paths. Listed lowest priority first.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Ignore `BEANSTALKER__*` environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Reject (default) or tolerate unknown keys in settings files.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Top-priority value for `key`. `None` is skipped so optional flags
    /// can be passed straight through.
    pub fn cli_override<V: Into<String>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.overrides.push((key.to_string(), value.into()));
        }
        self
    }

    pub fn load(self) -> Result<Settings, SyncError> {
        let files = sources::load_settings_files(&self.search_paths, FILE_NAME)?;
        let env_vars: Vec<(String, String)> = std::env::vars().collect();

        resolve(ResolveInput {
            files,
            env_vars,
            env_prefix: self.env_prefix,
            cli_overrides: self.overrides,
            strict: self.strict,
        })
    }
}
