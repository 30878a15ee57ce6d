use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;

use crate::errors::ModelError;
use crate::estimator::Artifacts;
use crate::models::house::HouseFeatures;

#[derive(Clone, Debug)]
pub struct PredictionService {
    artifacts: Arc<Artifacts>,
}

impl PredictionService {
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            artifacts: Arc::new(artifacts),
        }
    }

    /// Scale, run the regressor, and floor the result at zero.
    pub fn predict(&self, features: &HouseFeatures) -> Result<f64, ModelError> {
        let scaled = self.artifacts.scaler.transform(&features.to_vector());
        let raw = self.artifacts.regressor.predict(&scaled);
        if !raw.is_finite() {
            return Err(ModelError::NonFinitePrediction);
        }
        Ok(raw.max(0.0))
    }

    /// The line shown under the form: either a price or the reason there is none.
    #[instrument(name = "PredictionService: Estimate", skip(self, form))]
    pub fn estimate(&self, form: &HashMap<String, String>) -> String {
        let features = match HouseFeatures::from_form(form) {
            Ok(features) => features,
            Err(e) => {
                tracing::warn!("Rejected prediction input: {}", e);
                return format!("Error: {}", e);
            }
        };
        match self.predict(&features) {
            Ok(price) => {
                tracing::info!(price, "Prediction served");
                format!("Estimated House Price: ₹ {}", format_price(price))
            }
            Err(e) => {
                tracing::warn!("Prediction failed: {}", e);
                format!("Error: {}", e)
            }
        }
    }
}

/// Two decimals with comma thousands separators, e.g. `1,234,567.89`.
pub fn format_price(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}
