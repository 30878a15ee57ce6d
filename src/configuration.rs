use std::path::PathBuf;

use config::{Config, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub storage: StorageSettings,
    pub model: ModelSettings,
    pub session: SessionSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone)]
pub struct StorageSettings {
    /// JSON file holding every registered user, keyed by id.
    pub users_file: PathBuf,
}

#[derive(Deserialize, Clone)]
pub struct ModelSettings {
    pub scaler_path: PathBuf,
    pub regressor_path: PathBuf,
}

#[derive(Deserialize)]
pub struct SessionSettings {
    pub secret: SecretString,

    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub ttl_hours: i64,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn to_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`",
                other
            )),
        }
    }
}

pub fn get_configuration() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir()?;
    let configuration_directory = base_path.join("configurations");
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;
    let environment_filename = format!("{}.yaml", environment.to_str());

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(
            configuration_directory.join(environment_filename),
        ))
        // APP_SESSION__SECRET=... overrides session.secret
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
