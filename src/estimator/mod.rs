//! Loading of the pre-fitted scaler and regressor artifacts.

pub mod regressor;
pub mod scaler;

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::instrument;

pub use regressor::Regressor;
pub use scaler::StandardScaler;

use crate::errors::ModelError;

/// Both artifacts, validated against the expected feature layout.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub scaler: StandardScaler,
    pub regressor: Regressor,
}

impl Artifacts {
    #[instrument(name = "Loading model artifacts")]
    pub fn load(scaler_path: &Path, regressor_path: &Path) -> Result<Self, ModelError> {
        let scaler: StandardScaler = read_json(scaler_path)?;
        scaler.validate()?;
        let regressor: Regressor = read_json(regressor_path)?;
        regressor.validate()?;
        tracing::info!("Model artifacts loaded");
        Ok(Self { scaler, regressor })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ModelError::Json {
        path: path.display().to_string(),
        source,
    })
}
