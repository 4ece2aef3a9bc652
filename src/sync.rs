//! The `get` and `update` flows.
//!
//! [`Syncer`] owns every collaborator explicitly: a [`Connector`] for the
//! remote, the resolved [`Settings`], a [`Prompt`] for questions and a writer
//! for everything shown to the user. Nothing here touches stdin/stdout or a
//! global client directly.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::diff::diff;
use crate::error::SyncError;
use crate::prompt::Prompt;
use crate::remote::{self, Connector, EnvironmentApi};
use crate::select::{render_menu, select};
use crate::settings::Settings;
use crate::store;
use crate::types::SyncAction;

/// How a sync operation ended. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// `get` wrote the document to `path`.
    Saved { path: PathBuf },
    /// `update` found nothing to change.
    UpToDate,
    /// `update` was accepted; the environment is restarting.
    Updated {
        application: String,
        environment_name: String,
    },
    /// The user backed out. Not an error.
    Cancelled { reason: String },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Saved { path } => {
                write!(f, "Configuration saved to {}", path.display())
            }
            SyncOutcome::UpToDate => write!(f, "No changes found, environment is up to date"),
            SyncOutcome::Updated {
                application,
                environment_name,
            } => write!(
                f,
                "Update SUCCESSFUL. Application '{application}' environment '{environment_name}' is restarting"
            ),
            SyncOutcome::Cancelled { reason } => write!(f, "{reason}"),
        }
    }
}

enum Choice<T> {
    Picked(T),
    Cancelled(String),
}

pub struct Syncer<C, P, W> {
    connector: C,
    settings: Settings,
    prompt: P,
    out: W,
}

impl<C: Connector, P: Prompt, W: Write> Syncer<C, P, W> {
    pub fn new(connector: C, settings: Settings, prompt: P, out: W) -> Self {
        Self {
            connector,
            settings,
            prompt,
            out,
        }
    }

    /// Dispatch a [`SyncAction`].
    pub fn run(&mut self, action: &SyncAction) -> Result<SyncOutcome, SyncError> {
        match action {
            SyncAction::Get {
                application,
                environment_id,
                region,
                out_file,
            } => self.get(
                application.as_deref(),
                environment_id.as_deref(),
                region.as_deref(),
                out_file.as_deref(),
            ),
            SyncAction::Update {
                file,
                application,
                environment_id,
                region,
            } => self.update(
                file,
                application.as_deref(),
                environment_id.as_deref(),
                region.as_deref(),
            ),
        }
    }

    /// Fetch an environment's config, show it, and save it locally.
    ///
    /// A missing application or environment id is picked from a numbered
    /// menu; a missing output path is asked for after the config is shown.
    pub fn get(
        &mut self,
        application: Option<&str>,
        environment_id: Option<&str>,
        region: Option<&str>,
        out_file: Option<&Path>,
    ) -> Result<SyncOutcome, SyncError> {
        let region = region
            .map(str::to_string)
            .or_else(|| self.settings.region.clone())
            .ok_or(SyncError::RegionRequired)?;
        let api = self.connector.connect(&region)?;

        let application = match application {
            Some(app) => app.to_string(),
            None => {
                let apps = remote::list_applications(&api)?;
                match self.choose("application", &apps)? {
                    Choice::Picked(app) => app,
                    Choice::Cancelled(reason) => return Ok(SyncOutcome::Cancelled { reason }),
                }
            }
        };

        let environment_id = match environment_id {
            Some(id) => id.to_string(),
            None => {
                let environments = remote::list_environments(&api, &application)?;
                match self.choose("environment", &environments)? {
                    Choice::Picked(env) => env.id,
                    Choice::Cancelled(reason) => return Ok(SyncOutcome::Cancelled { reason }),
                }
            }
        };

        let document = remote::read_environment_config(
            &api,
            &region,
            &application,
            &environment_id,
            &self.settings.namespace,
        )?;
        let yaml = document.to_yaml().map_err(SyncError::Serialize)?;
        self.say(format_args!("{yaml}"))?;

        let requested = match out_file {
            Some(path) => path.to_path_buf(),
            None => {
                let answer = self.prompt.ask("Output file: ")?;
                let answer = answer.trim();
                if answer.is_empty() {
                    return Ok(SyncOutcome::Cancelled {
                        reason: "No output file given, canceling operation".into(),
                    });
                }
                PathBuf::from(answer)
            }
        };

        let path = store::with_default_extension(&requested, &self.settings.default_extension);
        store::save(&path, &document)?;
        info!(path = %path.display(), "saved environment config");

        Ok(SyncOutcome::Saved { path })
    }

    /// Diff a local file against its live environment and, once confirmed,
    /// push added and modified variables.
    ///
    /// The target is always the one recorded in the file; the optional flags
    /// only produce a warning when they disagree with it. Variables missing
    /// from the file are reported but never removed remotely.
    pub fn update(
        &mut self,
        file: &Path,
        application: Option<&str>,
        environment_id: Option<&str>,
        region: Option<&str>,
    ) -> Result<SyncOutcome, SyncError> {
        let proposed = store::load(file)?;

        for (flag, given, recorded) in [
            ("--app-name", application, proposed.application_name.as_str()),
            ("--env-id", environment_id, proposed.environment_id.as_str()),
            ("--region", region, proposed.region.as_str()),
        ] {
            if let Some(given) = given
                && given != recorded
            {
                warn!(flag, given, recorded, "ignoring flag; using the value from the file");
            }
        }

        let api = self.connector.connect(&proposed.region)?;
        let existing = remote::read_environment_config(
            &api,
            &proposed.region,
            &proposed.application_name,
            &proposed.environment_id,
            &self.settings.namespace,
        )?;

        let changes = diff(&proposed.env_config, &existing.env_config);
        debug!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            modified = changes.modified.len(),
            unchanged = changes.unchanged.len(),
            "compared local and live config"
        );

        if !changes.has_changes() {
            return Ok(SyncOutcome::UpToDate);
        }

        let report = changes.report(&proposed.env_config, &existing.env_config);
        self.say(format_args!("{report}"))?;

        let answer = self.prompt.ask("Update environment? [yes/no]: ")?;
        if answer != "yes" {
            return Ok(SyncOutcome::Cancelled {
                reason: "Canceling operation".into(),
            });
        }

        let option_settings = changes
            .keys_to_update(&proposed.env_config)
            .iter()
            .map(|(key, value)| remote::environment_variable(&self.settings.namespace, key, value))
            .collect();
        let ack = api.update_environment(
            &proposed.application_name,
            &proposed.environment_id,
            option_settings,
        )?;

        Ok(SyncOutcome::Updated {
            application: proposed.application_name,
            environment_name: ack.environment_name,
        })
    }

    fn choose<T: Clone + fmt::Display>(
        &mut self,
        what: &str,
        options: &[T],
    ) -> Result<Choice<T>, SyncError> {
        if options.is_empty() {
            return Ok(Choice::Cancelled(format!(
                "No {what}s found, canceling operation"
            )));
        }

        self.say(format_args!("Available {what}s:\n{}", render_menu(options)))?;
        let answer = self
            .prompt
            .ask(&format!("Select {what} [1-{}]: ", options.len()))?;

        Ok(match select(options, &answer) {
            Ok(picked) => Choice::Picked(picked),
            Err(e) => Choice::Cancelled(format!("Invalid selection: {e}, canceling operation")),
        })
    }

    fn say(&mut self, text: fmt::Arguments<'_>) -> Result<(), SyncError> {
        self.out.write_fmt(text).map_err(SyncError::Terminal)
    }
}
