use thiserror::Error;

use crate::ml::ModelError;
use crate::repo::StorageError;

/// Why a forecast run produced no forecast.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("no measurement data available")]
    NoMeasurementData,

    #[error("model failure: {0}")]
    ModelFailure(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),
}

impl ForecastError {
    /// Failures caused by the data or the model rather than the service itself.
    pub fn is_domain_failure(&self) -> bool {
        matches!(self, Self::NoMeasurementData | Self::ModelFailure(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoMeasurementData => "NoMeasurementData",
            Self::ModelFailure(_) => "ModelFailure",
            Self::StorageFailure(_) => "StorageFailure",
        }
    }
}

impl From<ModelError> for ForecastError {
    fn from(error: ModelError) -> Self {
        Self::ModelFailure(error.to_string())
    }
}

impl From<StorageError> for ForecastError {
    fn from(error: StorageError) -> Self {
        Self::StorageFailure(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_classification() {
        assert!(ForecastError::NoMeasurementData.is_domain_failure());
        assert!(ForecastError::ModelFailure("x".into()).is_domain_failure());
        assert!(!ForecastError::StorageFailure("x".into()).is_domain_failure());
    }

    #[test]
    fn test_conversions_keep_detail() {
        let err: ForecastError = ModelError::Invalid("horizon must be positive".into()).into();
        assert_eq!(
            err,
            ForecastError::ModelFailure("invalid model: horizon must be positive".into())
        );

        let err: ForecastError = StorageError::Connect("connection refused".into()).into();
        assert_eq!(err.kind(), "StorageFailure");
        assert!(err.to_string().contains("connection refused"));
    }
}
