use serde::Deserialize;

use crate::errors::ModelError;
use crate::models::house::{FEATURE_NAMES, N_FEATURES};

/// Fitted standardisation: `(x - mean) / scale` per column.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("scaler mean", self.mean.len())?;
        check_len("scaler scale", self.scale.len())?;
        if let Some(names) = &self.feature_names {
            check_len("scaler feature_names", names.len())?;
            if let Some((i, name)) = names
                .iter()
                .enumerate()
                .find(|(i, name)| name.as_str() != FEATURE_NAMES[*i])
            {
                tracing::warn!(
                    column = i,
                    fitted = %name,
                    expected = FEATURE_NAMES[i],
                    "Scaler was fitted with a different column order"
                );
            }
        }
        Ok(())
    }

    pub fn transform(&self, row: &[f64; N_FEATURES]) -> [f64; N_FEATURES] {
        let mut out = [0.0; N_FEATURES];
        for (i, value) in out.iter_mut().enumerate() {
            // Constant columns were fitted with zero spread.
            let scale = if self.scale[i] == 0.0 { 1.0 } else { self.scale[i] };
            *value = (row[i] - self.mean[i]) / scale;
        }
        out
    }
}

pub(crate) fn check_len(what: &'static str, actual: usize) -> Result<(), ModelError> {
    if actual != N_FEATURES {
        return Err(ModelError::Shape {
            what,
            expected: N_FEATURES,
            actual,
        });
    }
    Ok(())
}
