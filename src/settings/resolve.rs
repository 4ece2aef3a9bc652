//! Settings resolution: merge the layers and let confique fill defaults.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, so the full
//! pipeline is testable with synthetic inputs.

use std::path::{Path, PathBuf};

use confique::Config;
use toml::{Table, Value};

use super::Settings;
use super::sources::env_to_table;
use crate::error::SyncError;

type SettingsLayer = <Settings as Config>::Layer;

/// All pre-loaded data needed to resolve settings. No I/O happens here.
pub(crate) struct ResolveInput {
    /// File contents, lowest priority first.
    pub files: Vec<(PathBuf, String)>,
    /// Raw environment variable pairs.
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix. `None` disables the env layer.
    pub env_prefix: Option<String>,
    /// `(key, value)` pairs from CLI flags.
    pub cli_overrides: Vec<(String, String)>,
    /// Whether to reject unknown keys in settings files.
    pub strict: bool,
}

/// Resolve settings: files in order, then env vars, then CLI overrides.
/// Settings are flat, so each layer replaces keys wholesale.
pub(crate) fn resolve(input: ResolveInput) -> Result<Settings, SyncError> {
    let mut merged = Table::new();

    for (path, content) in &input.files {
        if input.strict {
            validate_unknown_keys(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|e| SyncError::SettingsParse {
            path: path.clone(),
            source: e,
        })?;
        merged.extend(table);
    }

    if let Some(prefix) = &input.env_prefix {
        merged.extend(env_to_table(prefix, input.env_vars));
    }

    merged.extend(
        input
            .cli_overrides
            .into_iter()
            .map(|(key, value)| (key, Value::String(value))),
    );

    let layer: SettingsLayer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| SyncError::InvalidSetting {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    Settings::builder()
        .preloaded(layer)
        .load()
        .map_err(SyncError::from)
}

/// Reject keys in a settings file that no field consumes.
fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), SyncError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: SettingsLayer = serde_ignored::deserialize(deserializer, |ignored| {
        unknown_keys.push(ignored.to_string());
    })
    .map_err(|e| SyncError::SettingsParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(());
    }

    let errors = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            SyncError::UnknownSettingsKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(SyncError::UnknownSettingsKeys(errors))
}

/// 1-indexed line of a top-level `key = ...` assignment, or 0 if not found.
fn find_key_line(content: &str, key: &str) -> usize {
    content
        .lines()
        .position(|line| {
            line.trim_start()
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        })
        .map_or(0, |i| i + 1)
}
