//! Remote config reader: the management API capability and the operations
//! built on it.
//!
//! The API is modelled as two traits. A [`Connector`] produces a
//! region-scoped [`EnvironmentApi`] handle; the handle exposes the five calls
//! this tool consumes. Everything else in the crate only ever sees these
//! traits, so the sync flow runs unchanged against the AWS adapter
//! ([`aws`], behind the `aws` feature) or an in-memory fake in tests.

#[cfg(feature = "aws")]
pub mod aws;

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::document::ConfigDocument;
use crate::error::SyncError;

/// Namespace holding user-defined environment variables.
pub const DEFAULT_ENV_NAMESPACE: &str = "aws:elasticbeanstalk:application:environment";

/// A `(namespace, option name, value)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSetting {
    pub namespace: String,
    pub option_name: String,
    pub value: String,
}

/// An environment as listed by the remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSummary {
    pub name: String,
    pub id: String,
}

impl fmt::Display for EnvironmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// One configuration-settings record of an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationSettings {
    pub option_settings: Vec<OptionSetting>,
}

/// Acknowledgement of an accepted environment update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAck {
    pub environment_name: String,
}

/// Region-scoped handle to the management API.
pub trait EnvironmentApi {
    fn list_applications(&self) -> Result<Vec<String>, SyncError>;

    fn list_environments(&self, application: &str) -> Result<Vec<EnvironmentSummary>, SyncError>;

    /// Environments of `application` whose id is `environment_id`.
    fn describe_environments(
        &self,
        application: &str,
        environment_id: &str,
    ) -> Result<Vec<EnvironmentSummary>, SyncError>;

    fn describe_configuration_settings(
        &self,
        application: &str,
        environment_name: &str,
    ) -> Result<Vec<ConfigurationSettings>, SyncError>;

    /// Merge `option_settings` into the environment. Options not listed are
    /// left alone. A client-side rejection is `SyncError::RemoteUpdateRejected`.
    fn update_environment(
        &self,
        application: &str,
        environment_id: &str,
        option_settings: Vec<OptionSetting>,
    ) -> Result<UpdateAck, SyncError>;
}

/// Builds region-scoped API handles.
pub trait Connector {
    type Api: EnvironmentApi;

    fn connect(&self, region: &str) -> Result<Self::Api, SyncError>;
}

/// Option setting for an environment variable in `namespace`.
pub fn environment_variable(namespace: &str, name: &str, value: &str) -> OptionSetting {
    OptionSetting {
        namespace: namespace.to_string(),
        option_name: name.to_string(),
        value: value.to_string(),
    }
}

/// Look up exactly one environment by application and id.
pub fn describe_environment<A: EnvironmentApi + ?Sized>(
    api: &A,
    application: &str,
    environment_id: &str,
) -> Result<EnvironmentSummary, SyncError> {
    let mut matches = api.describe_environments(application, environment_id)?;
    if matches.len() != 1 {
        return Err(SyncError::EnvironmentNotFound {
            application: application.to_string(),
            environment_id: environment_id.to_string(),
        });
    }
    Ok(matches.remove(0))
}

/// Fetch the environment variables of a named environment.
///
/// Options outside `namespace` are dropped.
pub fn environment_variables<A: EnvironmentApi + ?Sized>(
    api: &A,
    application: &str,
    environment_name: &str,
    namespace: &str,
) -> Result<BTreeMap<String, String>, SyncError> {
    let mut records = api.describe_configuration_settings(application, environment_name)?;
    if records.len() != 1 {
        return Err(SyncError::AmbiguousConfigurationResult {
            count: records.len(),
        });
    }

    Ok(records
        .remove(0)
        .option_settings
        .into_iter()
        .filter(|option| option.namespace == namespace)
        .map(|option| (option.option_name, option.value))
        .collect())
}

/// Build the document describing the live state of one environment.
pub fn read_environment_config<A: EnvironmentApi + ?Sized>(
    api: &A,
    region: &str,
    application: &str,
    environment_id: &str,
    namespace: &str,
) -> Result<ConfigDocument, SyncError> {
    let environment = describe_environment(api, application, environment_id)?;
    debug!(
        application,
        environment = %environment.name,
        environment_id,
        "reading environment config"
    );

    let env_config = environment_variables(api, application, &environment.name, namespace)?;
    debug!(count = env_config.len(), "fetched environment variables");

    Ok(ConfigDocument {
        application_name: application.to_string(),
        region: region.to_string(),
        environment_id: environment_id.to_string(),
        environment_name: environment.name,
        env_config,
    })
}

/// Names of all applications visible in the handle's region.
pub fn list_applications<A: EnvironmentApi + ?Sized>(api: &A) -> Result<Vec<String>, SyncError> {
    api.list_applications()
}

/// Environments belonging to `application`.
pub fn list_environments<A: EnvironmentApi + ?Sized>(
    api: &A,
    application: &str,
) -> Result<Vec<EnvironmentSummary>, SyncError> {
    api.list_environments(application)
}
