//! [`EnvironmentApi`] backed by the AWS Elastic Beanstalk SDK.
//!
//! The SDK is async; each handle owns a current-thread tokio runtime and
//! blocks on every call, so callers stay synchronous.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_elasticbeanstalk::Client;
use aws_sdk_elasticbeanstalk::error::{DisplayErrorContext, SdkError};
use aws_sdk_elasticbeanstalk::types::{ConfigurationOptionSetting, EnvironmentDescription};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::{
    ConfigurationSettings, Connector, EnvironmentApi, EnvironmentSummary, OptionSetting,
    UpdateAck,
};
use crate::error::SyncError;

/// Connects using the default AWS credential chain.
#[derive(Debug, Default, Clone, Copy)]
pub struct AwsConnector;

impl Connector for AwsConnector {
    type Api = AwsEnvironmentApi;

    fn connect(&self, region: &str) -> Result<AwsEnvironmentApi, SyncError> {
        let runtime = runtime()?;

        debug!(region, "loading AWS configuration");
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region.to_string()))
                .load(),
        );

        Ok(AwsEnvironmentApi {
            client: Client::new(&config),
            runtime,
        })
    }
}

/// Region-scoped Elastic Beanstalk client.
pub struct AwsEnvironmentApi {
    client: Client,
    runtime: Runtime,
}

impl AwsEnvironmentApi {
    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Result<Self, SyncError> {
        Ok(Self {
            client,
            runtime: runtime()?,
        })
    }
}

fn runtime() -> Result<Runtime, SyncError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| SyncError::Remote {
            operation: "connect",
            message: e.to_string(),
        })
}

fn remote_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> SyncError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    SyncError::Remote {
        operation,
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn summary(description: &EnvironmentDescription) -> EnvironmentSummary {
    EnvironmentSummary {
        name: description.environment_name().unwrap_or_default().to_string(),
        id: description.environment_id().unwrap_or_default().to_string(),
    }
}

impl EnvironmentApi for AwsEnvironmentApi {
    fn list_applications(&self) -> Result<Vec<String>, SyncError> {
        let output = self
            .runtime
            .block_on(self.client.describe_applications().send())
            .map_err(|e| remote_error("DescribeApplications", e))?;

        Ok(output
            .applications()
            .iter()
            .filter_map(|app| app.application_name())
            .map(str::to_string)
            .collect())
    }

    fn list_environments(&self, application: &str) -> Result<Vec<EnvironmentSummary>, SyncError> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .describe_environments()
                    .application_name(application)
                    .include_deleted(false)
                    .send(),
            )
            .map_err(|e| remote_error("DescribeEnvironments", e))?;

        Ok(output.environments().iter().map(summary).collect())
    }

    fn describe_environments(
        &self,
        application: &str,
        environment_id: &str,
    ) -> Result<Vec<EnvironmentSummary>, SyncError> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .describe_environments()
                    .application_name(application)
                    .environment_ids(environment_id)
                    .include_deleted(false)
                    .send(),
            )
            .map_err(|e| remote_error("DescribeEnvironments", e))?;

        Ok(output.environments().iter().map(summary).collect())
    }

    fn describe_configuration_settings(
        &self,
        application: &str,
        environment_name: &str,
    ) -> Result<Vec<ConfigurationSettings>, SyncError> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .describe_configuration_settings()
                    .application_name(application)
                    .environment_name(environment_name)
                    .send(),
            )
            .map_err(|e| remote_error("DescribeConfigurationSettings", e))?;

        Ok(output
            .configuration_settings()
            .iter()
            .map(|record| ConfigurationSettings {
                option_settings: record
                    .option_settings()
                    .iter()
                    .map(|option| OptionSetting {
                        namespace: option.namespace().unwrap_or_default().to_string(),
                        option_name: option.option_name().unwrap_or_default().to_string(),
                        value: option.value().unwrap_or_default().to_string(),
                    })
                    .collect(),
            })
            .collect())
    }

    fn update_environment(
        &self,
        application: &str,
        environment_id: &str,
        option_settings: Vec<OptionSetting>,
    ) -> Result<UpdateAck, SyncError> {
        let settings: Vec<ConfigurationOptionSetting> = option_settings
            .into_iter()
            .map(|option| {
                ConfigurationOptionSetting::builder()
                    .namespace(option.namespace)
                    .option_name(option.option_name)
                    .value(option.value)
                    .build()
            })
            .collect();

        let output = self
            .runtime
            .block_on(
                self.client
                    .update_environment()
                    .application_name(application)
                    .environment_id(environment_id)
                    .set_option_settings(Some(settings))
                    .send(),
            )
            .map_err(|err| {
                if matches!(err, SdkError::ServiceError(_)) {
                    SyncError::RemoteUpdateRejected {
                        message: DisplayErrorContext(&err).to_string(),
                    }
                } else {
                    remote_error("UpdateEnvironment", err)
                }
            })?;

        Ok(UpdateAck {
            environment_name: output.environment_name().unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_elasticbeanstalk::config::retry::RetryConfig;
    use aws_sdk_elasticbeanstalk::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_elasticbeanstalk::error::ErrorMetadata;
    use aws_sdk_elasticbeanstalk::operation::describe_configuration_settings::DescribeConfigurationSettingsOutput;
    use aws_sdk_elasticbeanstalk::operation::describe_environments::DescribeEnvironmentsOutput;
    use aws_sdk_elasticbeanstalk::operation::update_environment::{
        UpdateEnvironmentError, UpdateEnvironmentOutput,
    };
    use aws_sdk_elasticbeanstalk::types::ConfigurationSettingsDescription;
    use aws_smithy_mocks::{mock, mock_client};

    use crate::remote::DEFAULT_ENV_NAMESPACE;

    fn environment(name: &str, id: &str) -> EnvironmentDescription {
        EnvironmentDescription::builder()
            .environment_name(name)
            .environment_id(id)
            .build()
    }

    fn aws_option(namespace: &str, name: &str, value: &str) -> ConfigurationOptionSetting {
        ConfigurationOptionSetting::builder()
            .namespace(namespace)
            .option_name(name)
            .value(value)
            .build()
    }

    #[test]
    fn list_environments_skips_deleted_and_maps_summaries() {
        let rule = mock!(Client::describe_environments)
            .match_requests(|req| {
                req.application_name() == Some("shop") && req.include_deleted() == Some(false)
            })
            .then_output(|| {
                DescribeEnvironmentsOutput::builder()
                    .environments(environment("shop-prod", "e-prod"))
                    .environments(environment("shop-staging", "e-stage"))
                    .build()
            });
        let api =
            AwsEnvironmentApi::from_client(mock_client!(aws_sdk_elasticbeanstalk, [&rule])).unwrap();

        let envs = api.list_environments("shop").unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(
            envs,
            vec![
                EnvironmentSummary {
                    name: "shop-prod".into(),
                    id: "e-prod".into(),
                },
                EnvironmentSummary {
                    name: "shop-staging".into(),
                    id: "e-stage".into(),
                },
            ]
        );
    }

    #[test]
    fn describe_environments_filters_by_id() {
        let rule = mock!(Client::describe_environments)
            .match_requests(|req| {
                req.application_name() == Some("shop")
                    && req.environment_ids() == ["e-prod".to_string()]
                    && req.include_deleted() == Some(false)
            })
            .then_output(|| {
                DescribeEnvironmentsOutput::builder()
                    .environments(environment("shop-prod", "e-prod"))
                    .build()
            });
        let api =
            AwsEnvironmentApi::from_client(mock_client!(aws_sdk_elasticbeanstalk, [&rule])).unwrap();

        let envs = api.describe_environments("shop", "e-prod").unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0].to_string(), "shop-prod (e-prod)");
    }

    #[test]
    fn describe_configuration_settings_maps_options() {
        let rule = mock!(Client::describe_configuration_settings)
            .match_requests(|req| {
                req.application_name() == Some("shop")
                    && req.environment_name() == Some("shop-prod")
            })
            .then_output(|| {
                DescribeConfigurationSettingsOutput::builder()
                    .configuration_settings(
                        ConfigurationSettingsDescription::builder()
                            .option_settings(aws_option(DEFAULT_ENV_NAMESPACE, "DB_HOST", "db"))
                            .option_settings(aws_option(
                                "aws:autoscaling:asg",
                                "MinSize",
                                "1",
                            ))
                            .build(),
                    )
                    .build()
            });
        let api =
            AwsEnvironmentApi::from_client(mock_client!(aws_sdk_elasticbeanstalk, [&rule])).unwrap();

        let records = api
            .describe_configuration_settings("shop", "shop-prod")
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].option_settings,
            vec![
                OptionSetting {
                    namespace: DEFAULT_ENV_NAMESPACE.into(),
                    option_name: "DB_HOST".into(),
                    value: "db".into(),
                },
                OptionSetting {
                    namespace: "aws:autoscaling:asg".into(),
                    option_name: "MinSize".into(),
                    value: "1".into(),
                },
            ]
        );
    }

    #[test]
    fn update_sends_option_settings_and_returns_environment_name() {
        let rule = mock!(Client::update_environment)
            .match_requests(|req| {
                req.environment_id() == Some("e-prod")
                    && req.option_settings()
                        == [aws_option(DEFAULT_ENV_NAMESPACE, "param2", "newval2")]
            })
            .then_output(|| {
                UpdateEnvironmentOutput::builder()
                    .environment_name("shop-prod")
                    .build()
            });
        let api =
            AwsEnvironmentApi::from_client(mock_client!(aws_sdk_elasticbeanstalk, [&rule])).unwrap();

        let ack = api
            .update_environment(
                "shop",
                "e-prod",
                vec![OptionSetting {
                    namespace: DEFAULT_ENV_NAMESPACE.into(),
                    option_name: "param2".into(),
                    value: "newval2".into(),
                }],
            )
            .unwrap();

        assert_eq!(rule.num_calls(), 1);
        assert_eq!(ack.environment_name, "shop-prod");
    }

    #[test]
    fn update_service_error_is_a_rejection() {
        let rule = mock!(Client::update_environment).then_error(|| {
            UpdateEnvironmentError::generic(
                ErrorMetadata::builder()
                    .code("InvalidParameterValue")
                    .message("Environment named shop-prod is in an invalid state")
                    .build(),
            )
        });
        let api =
            AwsEnvironmentApi::from_client(mock_client!(aws_sdk_elasticbeanstalk, [&rule])).unwrap();

        let err = api.update_environment("shop", "e-prod", Vec::new()).unwrap_err();

        match err {
            SyncError::RemoteUpdateRejected { message } => {
                assert!(message.contains("InvalidParameterValue"), "{message}");
            }
            other => panic!("expected RemoteUpdateRejected, got {other:?}"),
        }
    }

    #[test]
    fn update_dispatch_failure_is_a_remote_error() {
        // Nothing listens on port 1, so the request never reaches a service.
        let config = aws_sdk_elasticbeanstalk::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .retry_config(RetryConfig::disabled())
            .build();
        let api = AwsEnvironmentApi::from_client(Client::from_conf(config)).unwrap();

        let err = api.update_environment("shop", "e-prod", Vec::new()).unwrap_err();

        assert!(
            matches!(
                err,
                SyncError::Remote {
                    operation: "UpdateEnvironment",
                    ..
                }
            ),
            "{err:?}"
        );
    }
}
