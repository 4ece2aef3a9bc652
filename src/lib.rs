//! Keep Elastic Beanstalk environment variables in a file you can review,
//! diff and commit.
//!
//! Beanstalker moves the user-defined environment variables of one
//! environment between the live service and a small YAML document:
//!
//! ```text
//! ApplicationName: shop
//! Region: eu-west-1
//! EnvironmentID: e-abc123
//! EnvironmentName: shop-prod
//! EnvConfig:
//!   DB_HOST: db.internal
//!   WORKERS: '4'
//! ```
//!
//! # Operations
//!
//! - **get** fetches the live variables of an environment and writes the
//!   document. Missing application or environment ids are picked from a
//!   numbered menu; a missing output path is asked for.
//! - **update** reads a document, compares it with the live environment and,
//!   after an explicit `yes`, submits every added or modified variable.
//!   Variables present only remotely are listed but never removed.
//!
//! Both flows live in [`Syncer`], which receives its collaborators
//! explicitly: a [`Connector`] for the management API, the resolved
//! [`Settings`], a [`Prompt`] and an output writer. The same flows run
//! against the AWS SDK adapter ([`remote::aws`], behind the `aws` feature) or
//! an in-memory fake.
//!
//! # Pure core
//!
//! The parts with real logic take plain values and return plain values:
//!
//! - [`diff()`] partitions two key/value maps into added, removed, modified
//!   and unchanged keys.
//! - [`select()`] maps an answer to a numbered menu back to an option.
//! - [`ConfigDocument::to_yaml`] / [`ConfigDocument::from_yaml`] handle the
//!   file format without touching the file system.
//!
//! # Settings
//!
//! Tool settings (default region, variable namespace, output extension, log
//! filter) resolve through layers: compiled defaults, `beanstalker.toml` in
//! the platform config dir, `~/.beanstalker/` and the working directory,
//! `BEANSTALKER__*` environment variables, then CLI flags. See [`settings`].
//!
//! # Error handling
//!
//! Every fallible operation returns [`SyncError`]. Nothing is retried: a
//! rejected update is reported with the service's message and the user is
//! told to run the command again later. Backing out of a prompt is not an
//! error; it ends in [`SyncOutcome::Cancelled`].

pub mod error;
pub mod remote;
pub mod settings;
pub mod types;

#[cfg(feature = "clap")]
mod cli;
mod diff;
mod document;
mod prompt;
mod select;
mod store;
mod sync;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "clap")]
pub use cli::Cli;
pub use diff::{ConfigDiff, DiffReport, ValueChange, diff};
pub use document::ConfigDocument;
pub use error::SyncError;
pub use prompt::{Prompt, StdinPrompt};
pub use remote::{Connector, EnvironmentApi};
pub use select::{SelectionError, render_menu, select};
pub use settings::{Settings, SettingsLoader};
pub use store::{load, save, with_default_extension};
pub use sync::{SyncOutcome, Syncer};
pub use types::{SearchPath, SyncAction};
