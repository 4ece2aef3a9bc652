#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet, VecDeque};
    use std::rc::Rc;

    use crate::error::SyncError;
    use crate::prompt::Prompt;
    use crate::remote::{
        ConfigurationSettings, Connector, DEFAULT_ENV_NAMESPACE, EnvironmentApi,
        EnvironmentSummary, OptionSetting, UpdateAck,
    };

    pub fn option(namespace: &str, name: &str, value: &str) -> OptionSetting {
        OptionSetting {
            namespace: namespace.into(),
            option_name: name.into(),
            value: value.into(),
        }
    }

    pub fn env_option(name: &str, value: &str) -> OptionSetting {
        option(DEFAULT_ENV_NAMESPACE, name, value)
    }

    /// An update call as seen by the fake.
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedUpdate {
        pub application: String,
        pub environment_id: String,
        pub option_settings: Vec<OptionSetting>,
    }

    /// In-memory management API. Clones share the update log.
    #[derive(Debug, Clone, Default)]
    pub struct FakeApi {
        environments: Vec<(String, EnvironmentSummary)>,
        settings: BTreeMap<String, Vec<ConfigurationSettings>>,
        reject_update: Option<String>,
        pub updates: Rc<RefCell<Vec<RecordedUpdate>>>,
    }

    impl FakeApi {
        pub fn with_environment(application: &str, id: &str, name: &str) -> Self {
            let mut api = Self::default();
            api.add_environment(application, id, name);
            api
        }

        pub fn add_environment(&mut self, application: &str, id: &str, name: &str) {
            self.environments.push((
                application.into(),
                EnvironmentSummary {
                    name: name.into(),
                    id: id.into(),
                },
            ));
        }

        pub fn set_settings(&mut self, environment_name: &str, records: Vec<ConfigurationSettings>) {
            self.settings.insert(environment_name.into(), records);
        }

        /// One settings record holding `vars` plus an unrelated platform option.
        pub fn set_env_vars(&mut self, environment_name: &str, vars: &[(&str, &str)]) {
            let mut option_settings = vec![option("aws:autoscaling:asg", "MinSize", "1")];
            option_settings.extend(vars.iter().map(|(k, v)| env_option(k, v)));
            self.set_settings(environment_name, vec![ConfigurationSettings { option_settings }]);
        }

        pub fn reject_updates_with(&mut self, message: &str) {
            self.reject_update = Some(message.into());
        }

        pub fn recorded_updates(&self) -> Vec<RecordedUpdate> {
            self.updates.borrow().clone()
        }
    }

    impl EnvironmentApi for FakeApi {
        fn list_applications(&self) -> Result<Vec<String>, SyncError> {
            let names: BTreeSet<String> =
                self.environments.iter().map(|(app, _)| app.clone()).collect();
            Ok(names.into_iter().collect())
        }

        fn list_environments(
            &self,
            application: &str,
        ) -> Result<Vec<EnvironmentSummary>, SyncError> {
            Ok(self
                .environments
                .iter()
                .filter(|(app, _)| app == application)
                .map(|(_, env)| env.clone())
                .collect())
        }

        fn describe_environments(
            &self,
            application: &str,
            environment_id: &str,
        ) -> Result<Vec<EnvironmentSummary>, SyncError> {
            Ok(self
                .environments
                .iter()
                .filter(|(app, env)| app == application && env.id == environment_id)
                .map(|(_, env)| env.clone())
                .collect())
        }

        fn describe_configuration_settings(
            &self,
            _application: &str,
            environment_name: &str,
        ) -> Result<Vec<ConfigurationSettings>, SyncError> {
            Ok(self
                .settings
                .get(environment_name)
                .cloned()
                .unwrap_or_else(|| vec![ConfigurationSettings::default()]))
        }

        fn update_environment(
            &self,
            application: &str,
            environment_id: &str,
            option_settings: Vec<OptionSetting>,
        ) -> Result<UpdateAck, SyncError> {
            if let Some(message) = &self.reject_update {
                return Err(SyncError::RemoteUpdateRejected {
                    message: message.clone(),
                });
            }
            self.updates.borrow_mut().push(RecordedUpdate {
                application: application.into(),
                environment_id: environment_id.into(),
                option_settings,
            });
            let environment_name = self
                .environments
                .iter()
                .find(|(_, env)| env.id == environment_id)
                .map(|(_, env)| env.name.clone())
                .unwrap_or_default();
            Ok(UpdateAck { environment_name })
        }
    }

    /// Hands out clones of one [`FakeApi`] and records requested regions.
    #[derive(Debug, Default)]
    pub struct FakeConnector {
        pub api: FakeApi,
        pub regions: RefCell<Vec<String>>,
    }

    impl FakeConnector {
        pub fn new(api: FakeApi) -> Self {
            Self {
                api,
                regions: RefCell::default(),
            }
        }
    }

    impl Connector for FakeConnector {
        type Api = FakeApi;

        fn connect(&self, region: &str) -> Result<FakeApi, SyncError> {
            self.regions.borrow_mut().push(region.into());
            Ok(self.api.clone())
        }
    }

    /// Answers questions from a fixed script. Running out is an EOF error.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        answers: VecDeque<String>,
        pub questions: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                questions: Vec::new(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&mut self, question: &str) -> Result<String, SyncError> {
            self.questions.push(question.into());
            self.answers.pop_front().ok_or_else(|| {
                SyncError::Terminal(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("no scripted answer for {question:?}"),
                ))
            })
        }
    }

    #[test]
    fn fake_lists_applications_once_each() {
        let mut api = FakeApi::with_environment("shop", "e-1", "shop-prod");
        api.add_environment("shop", "e-2", "shop-staging");
        assert_eq!(api.list_applications().unwrap(), vec!["shop"]);
    }

    #[test]
    fn connector_clones_share_update_log() {
        let connector = FakeConnector::new(FakeApi::with_environment("shop", "e-1", "shop-prod"));
        let handle = connector.connect("us-east-1").unwrap();
        handle
            .update_environment("shop", "e-1", vec![env_option("A", "1")])
            .unwrap();
        assert_eq!(connector.api.recorded_updates().len(), 1);
        assert_eq!(*connector.regions.borrow(), vec!["us-east-1".to_string()]);
    }
}
