use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config_env")]
use figment::providers::Env;
#[cfg(feature = "config_json")]
use figment::providers::Json;
#[cfg(feature = "config_yaml")]
use figment::providers::Yaml;
use figment::providers::{Data, Format};
use figment::Figment;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_with::{serde_as, DurationMilliSeconds};
use tokio::sync::Semaphore;
use url::Url;

use super::{ConfigParsingError, ConfigValidationError};

pub const DEFAULT_MAX_SESSIONS: usize = 20;
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub identity: ClientIdentity,
    pub urls: ServiceUrls,
    #[serde(default)]
    pub pool: SessionPoolConfig,
}

/// Credentials of the application provider towards the MSSP.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    pub ap_id: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub ap_password: SecretString,
    pub mssp_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUrls {
    pub signature_service: Url,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPoolConfig {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
    /// How long a caller may wait for a free session. Zero fails immediately.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_max_wait")]
    pub max_wait: Duration,
}

impl Default for SessionPoolConfig {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

pub enum InputFormat {
    #[cfg(feature = "config_yaml")]
    Yaml(Data<Yaml>),
    #[cfg(feature = "config_json")]
    Json(Data<Json>),
}

impl InputFormat {
    #[cfg(feature = "config_yaml")]
    pub fn yaml_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Yaml(Yaml::file(p))
    }

    #[cfg(feature = "config_yaml")]
    pub fn yaml_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Yaml(Yaml::string(s.as_ref()))
    }

    #[cfg(feature = "config_json")]
    pub fn json_file(p: impl AsRef<Path>) -> InputFormat {
        InputFormat::Json(Json::file(p))
    }

    #[cfg(feature = "config_json")]
    pub fn json_str(s: impl AsRef<str>) -> InputFormat {
        InputFormat::Json(Json::string(s.as_ref()))
    }
}

impl ClientConfig {
    pub fn from_files(files: &[impl AsRef<Path>]) -> Result<Self, ConfigParsingError> {
        let mut inputs: Vec<InputFormat> = Vec::with_capacity(files.len());

        for path in files {
            #[cfg(feature = "config_yaml")]
            if path
                .as_ref()
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
            {
                inputs.push(InputFormat::yaml_file(path));
                continue;
            }

            #[cfg(feature = "config_json")]
            if path.as_ref().extension().is_some_and(|ext| ext == "json") {
                inputs.push(InputFormat::json_file(path));
                continue;
            }

            return Err(ConfigParsingError::GeneralParsingError(format!(
                "Unsupported file or missing file extension: {:?}",
                path.as_ref().to_str()
            )));
        }

        Self::parse(inputs)
    }

    #[cfg(feature = "config_yaml")]
    pub fn from_yaml_str(config: impl AsRef<str>) -> Result<Self, ConfigParsingError> {
        Self::parse([InputFormat::yaml_str(config)])
    }

    #[cfg(feature = "config_json")]
    pub fn from_json_str(config: impl AsRef<str>) -> Result<Self, ConfigParsingError> {
        Self::parse([InputFormat::json_str(config)])
    }

    /// Later inputs override earlier ones. With `config_env`, `MID_`-prefixed
    /// variables override everything, `__` separating nested keys.
    pub fn parse(
        inputs: impl IntoIterator<Item = InputFormat>,
    ) -> Result<Self, ConfigParsingError> {
        let mut figment = Figment::new();

        for data in inputs {
            figment = match data {
                #[cfg(feature = "config_yaml")]
                InputFormat::Yaml(content) => figment.merge(content),
                #[cfg(feature = "config_json")]
                InputFormat::Json(content) => figment.merge(content),
            };
        }

        #[cfg(feature = "config_env")]
        {
            figment = figment.merge(Env::prefixed("MID_").split("__").lowercase(false));
        }

        figment
            .extract::<ClientConfig>()
            .map_err(|e| ConfigParsingError::GeneralParsingError(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.identity.ap_id.trim().is_empty() {
            return Err(ConfigValidationError::MissingValue("identity.apId"));
        }
        if self.identity.ap_password.expose_secret().is_empty() {
            return Err(ConfigValidationError::MissingValue("identity.apPassword"));
        }
        if self.identity.mssp_id.trim().is_empty() {
            return Err(ConfigValidationError::MissingValue("identity.msspId"));
        }
        if self.pool.max_sessions == 0 {
            return Err(ConfigValidationError::InvalidValue {
                key: "pool.maxSessions",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.pool.max_sessions > Semaphore::MAX_PERMITS {
            return Err(ConfigValidationError::InvalidValue {
                key: "pool.maxSessions",
                reason: format!("must not exceed {}", Semaphore::MAX_PERMITS),
            });
        }
        Ok(())
    }
}

fn default_max_sessions() -> usize {
    DEFAULT_MAX_SESSIONS
}

fn default_max_wait() -> Duration {
    DEFAULT_MAX_WAIT
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}
