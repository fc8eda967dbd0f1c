//! Storage seams for the forecast pipeline.
//!
//! The orchestrator only sees the traits below. With the `db` feature they are
//! backed by PostgreSQL ([`pg::PgRepo`]), otherwise by [`memory::MemoryRepo`].

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::Config;
use crate::domain::{ForecastResult, Measurement, NewForecast};

pub mod memory;
#[cfg(feature = "db")]
pub mod pg;

pub use memory::MemoryRepo;
#[cfg(feature = "db")]
pub use pg::PgRepo;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to connect to storage: {0}")]
    Connect(String),

    #[error("storage query failed: {0}")]
    Query(String),
}

/// Source of historical generation measurements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementReader: Send + Sync {
    /// Full history ordered by timestamp ascending, rows without a value excluded.
    async fn load_measurements(&self) -> Result<Vec<Measurement>, StorageError>;
}

/// Append-only sink for forecasts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForecastWriter: Send + Sync {
    /// Append one row; the storage assigns `id` and `created_at`.
    async fn save_forecast(&self, forecast: &NewForecast) -> Result<ForecastResult, StorageError>;
}

#[async_trait]
pub trait StorageProbe: Send + Sync {
    async fn ping(&self) -> Result<(), StorageError>;
}

pub struct Repositories {
    pub measurements: Arc<dyn MeasurementReader>,
    pub forecasts: Arc<dyn ForecastWriter>,
    pub probe: Arc<dyn StorageProbe>,
}

impl Repositories {
    pub async fn new(cfg: &Config) -> Result<Self> {
        #[cfg(feature = "db")]
        {
            let repo = Arc::new(PgRepo::new(&cfg.db)?);
            if cfg.db.apply_schema {
                repo.apply_schema().await?;
            }
            return Ok(Self::from_store(repo));
        }

        #[cfg(not(feature = "db"))]
        {
            let _ = cfg;
            tracing::warn!("built without the db feature, forecasts are kept in memory only");
            return Ok(Self::from_store(Arc::new(MemoryRepo::default())));
        }
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: MeasurementReader + ForecastWriter + StorageProbe + 'static,
    {
        Self {
            measurements: store.clone(),
            forecasts: store.clone(),
            probe: store,
        }
    }
}
