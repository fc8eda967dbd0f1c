//! Forecasting model adapter
//!
//! The trained model is an opaque artifact on disk with a single contract:
//! given a horizon in hourly steps, return that many predicted generation
//! increments. Training happens elsewhere.
//!
//! - [`models`]: the [`ForecastModel`] trait and the seasonal AR model
//! - [`artifact`]: reading a model artifact from disk
//! - [`inference`]: the adapter the orchestrator calls on every run

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod artifact;
pub mod inference;
pub mod models;

pub use artifact::{ArtifactFormat, ArtifactLoader};
pub use inference::ModelAdapter;
pub use models::{ForecastModel, SeasonalArModel};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact {}: {source}", path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode model artifact {}: {detail}", path.display())]
    Decode { path: PathBuf, detail: String },

    #[error("invalid model: {0}")]
    Invalid(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Metadata stored alongside the trained parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub version: String,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
}

/// Produces a freshly loaded model for each forecast run.
pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn ForecastModel>, ModelError>;
}
