//! Model definitions

use serde::{Deserialize, Serialize};

use super::{ModelError, ModelMetadata};

/// A trained model that extrapolates hourly generation increments.
pub trait ForecastModel: Send + Sync {
    /// Predict the next `horizon` steps following the training data.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>, ModelError>;

    fn metadata(&self) -> &ModelMetadata;
}

/// Seasonal autoregressive model
///
/// ```text
/// y[t] = intercept
///      + Σ ar[i]          · y[t - 1 - i]
///      + Σ seasonal_ar[j] · y[t - (j + 1) · season_length]
/// ```
///
/// `history` holds the most recent observed increments (oldest first) and must
/// reach back at least as far as the deepest lag. Predictions are fed back into
/// the recursion, so step `k` may depend on steps `< k`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalArModel {
    #[serde(default)]
    pub metadata: ModelMetadata,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default)]
    pub ar: Vec<f64>,
    #[serde(default)]
    pub season_length: usize,
    #[serde(default)]
    pub seasonal_ar: Vec<f64>,
    pub history: Vec<f64>,
}

impl SeasonalArModel {
    /// Number of past observations the recursion reads.
    pub fn required_history(&self) -> usize {
        self.ar
            .len()
            .max(self.seasonal_ar.len() * self.season_length)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if !self.seasonal_ar.is_empty() && self.season_length == 0 {
            return Err(ModelError::Invalid(
                "seasonal coefficients require season_length > 0".to_string(),
            ));
        }

        let params = std::iter::once(&self.intercept)
            .chain(&self.ar)
            .chain(&self.seasonal_ar)
            .chain(&self.history);
        if params.into_iter().any(|v| !v.is_finite()) {
            return Err(ModelError::Invalid("non-finite parameter".to_string()));
        }

        let required = self.required_history();
        if self.history.len() < required {
            return Err(ModelError::Invalid(format!(
                "history holds {} observations, lags need {}",
                self.history.len(),
                required
            )));
        }
        Ok(())
    }
}

impl ForecastModel for SeasonalArModel {
    fn predict(&self, horizon: usize) -> Result<Vec<f64>, ModelError> {
        if horizon == 0 {
            return Err(ModelError::Invalid("horizon must be positive".to_string()));
        }
        self.validate()?;

        let offset = self.history.len();
        let mut series = Vec::with_capacity(offset + horizon);
        series.extend_from_slice(&self.history);

        for step in 0..horizon {
            let t = series.len();
            let mut y = self.intercept;
            for (i, phi) in self.ar.iter().enumerate() {
                y += phi * series[t - 1 - i];
            }
            for (j, phi) in self.seasonal_ar.iter().enumerate() {
                y += phi * series[t - (j + 1) * self.season_length];
            }
            if !y.is_finite() {
                return Err(ModelError::Inference(format!(
                    "non-finite prediction at step {step}"
                )));
            }
            series.push(y);
        }

        Ok(series.split_off(offset))
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
