#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Asia::Seoul;
use solar_forecast::domain::{ForecastResult, Measurement, NewForecast, HORIZON_STEPS};
use solar_forecast::ml::{ForecastModel, ModelError, ModelLoader, ModelMetadata};
use solar_forecast::repo::{ForecastWriter, MeasurementReader, StorageError, StorageProbe};

/// Model that returns a fixed increment sequence.
pub struct FixedModel {
    values: Vec<f64>,
    metadata: ModelMetadata,
}

impl ForecastModel for FixedModel {
    fn predict(&self, _horizon: usize) -> Result<Vec<f64>, ModelError> {
        Ok(self.values.clone())
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

pub enum FixedLoader {
    Values(Vec<f64>),
    Broken(String),
}

impl FixedLoader {
    /// 523.4 kWh over the full horizon.
    pub fn scenario() -> Arc<Self> {
        let mut values = vec![0.0; HORIZON_STEPS];
        values[0] = 523.4;
        Arc::new(Self::Values(values))
    }

    pub fn constant(value: f64) -> Arc<Self> {
        Arc::new(Self::Values(vec![value; HORIZON_STEPS]))
    }

    pub fn broken(detail: &str) -> Arc<Self> {
        Arc::new(Self::Broken(detail.to_string()))
    }
}

impl ModelLoader for FixedLoader {
    fn load(&self) -> Result<Box<dyn ForecastModel>, ModelError> {
        match self {
            Self::Values(values) => Ok(Box::new(FixedModel {
                values: values.clone(),
                metadata: ModelMetadata {
                    model_id: "fixed".to_string(),
                    ..ModelMetadata::default()
                },
            })),
            Self::Broken(detail) => Err(ModelError::Invalid(detail.clone())),
        }
    }
}

/// Loader that takes a while before handing over a constant model.
pub struct SlowLoader {
    pub delay: Duration,
    pub value: f64,
}

impl ModelLoader for SlowLoader {
    fn load(&self) -> Result<Box<dyn ForecastModel>, ModelError> {
        std::thread::sleep(self.delay);
        FixedLoader::Values(vec![self.value; HORIZON_STEPS]).load()
    }
}

/// Storage that refuses every call.
pub struct UnreachableStore;

#[async_trait]
impl MeasurementReader for UnreachableStore {
    async fn load_measurements(&self) -> Result<Vec<Measurement>, StorageError> {
        Err(StorageError::Connect("connection refused".to_string()))
    }
}

#[async_trait]
impl ForecastWriter for UnreachableStore {
    async fn save_forecast(&self, _forecast: &NewForecast) -> Result<ForecastResult, StorageError> {
        Err(StorageError::Connect("connection refused".to_string()))
    }
}

#[async_trait]
impl StorageProbe for UnreachableStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Err(StorageError::Connect("connection refused".to_string()))
    }
}

pub fn seoul(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Seoul
        .with_ymd_and_hms(y, m, d, h, 0, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Storage whose reader panics mid-request.
pub struct PanickingStore;

#[async_trait]
impl MeasurementReader for PanickingStore {
    async fn load_measurements(&self) -> Result<Vec<Measurement>, StorageError> {
        panic!("measurement cursor corrupted");
    }
}

#[async_trait]
impl ForecastWriter for PanickingStore {
    async fn save_forecast(&self, _forecast: &NewForecast) -> Result<ForecastResult, StorageError> {
        Err(StorageError::Query("unreachable".to_string()))
    }
}

#[async_trait]
impl StorageProbe for PanickingStore {
    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
