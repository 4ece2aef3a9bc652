//! The configuration document exchanged between the remote and local files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Snapshot of one environment's user-defined environment variables.
///
/// Serialized as YAML with the field order below; `EnvConfig` is sorted by
/// key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(rename = "ApplicationName")]
    pub application_name: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "EnvironmentID")]
    pub environment_id: String,
    #[serde(rename = "EnvironmentName")]
    pub environment_name: String,
    #[serde(rename = "EnvConfig", default, deserialize_with = "scalar_values")]
    pub env_config: BTreeMap<String, String>,
}

/// Read `EnvConfig` values as their literal text, so unquoted `4`, `1.10`
/// or `false` arrive exactly as written. An empty value reads as `""`;
/// nested sequences and mappings are rejected.
fn scalar_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

impl ConfigDocument {
    /// Render as the YAML text stored on disk.
    pub fn to_yaml(&self) -> Result<String, serde_yaml_ng::Error> {
        serde_yaml_ng::to_string(self)
    }

    /// Parse the YAML text stored on disk.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml_ng::Error> {
        serde_yaml_ng::from_str(content)
    }
}
