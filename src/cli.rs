//! Clap adapter for beanstalker.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The only
//! bridge to the core is [`Cli::into_action()`], which turns parsed arguments
//! into a framework-agnostic [`SyncAction`](crate::SyncAction). The action is
//! a free positional rather than a subcommand so an unknown action can be
//! reported with its own message and exit code.

use std::path::PathBuf;

use clap::Parser;

use crate::error::SyncError;
use crate::types::SyncAction;

/// Sync Elastic Beanstalk environment variables with a local YAML file.
#[derive(Debug, Parser)]
#[command(name = "beanstalker", version)]
pub struct Cli {
    /// Action to perform: `get` or `update`.
    pub action: String,

    /// Configuration file. Required by `update`; accepted and ignored by `get`.
    pub file: Option<PathBuf>,

    /// Application name. Asked for interactively by `get` when omitted.
    #[arg(long)]
    pub app_name: Option<String>,

    /// Environment id (e.g. "e-abc123"). Asked for interactively by `get` when omitted.
    #[arg(long)]
    pub env_id: Option<String>,

    /// AWS region. Falls back to `region` in beanstalker.toml.
    #[arg(long)]
    pub region: Option<String>,

    /// Where `get` writes the configuration. Asked for when omitted.
    #[arg(long)]
    pub out_file: Option<PathBuf>,

    /// Log debug details to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Convert parsed args into a `SyncAction`.
    ///
    /// `update` reads its target from the file, so the app/env/region flags
    /// are carried along only for consistency checks.
    pub fn into_action(self) -> Result<SyncAction, SyncError> {
        match self.action.as_str() {
            "get" => Ok(SyncAction::Get {
                application: self.app_name,
                environment_id: self.env_id,
                region: self.region,
                out_file: self.out_file,
            }),
            "update" => Ok(SyncAction::Update {
                file: self.file.ok_or(SyncError::MissingFile)?,
                application: self.app_name,
                environment_id: self.env_id,
                region: self.region,
            }),
            _ => Err(SyncError::UnknownAction(self.action)),
        }
    }
}
