#![cfg(feature = "db")]

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgConnection},
    Connection, FromRow,
};
use tracing::{debug, info, warn};

use super::{ForecastWriter, MeasurementReader, StorageError, StorageProbe};
use crate::config::DbConfig;
use crate::domain::{ForecastResult, Measurement, NewForecast};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

#[derive(Debug, Clone, FromRow)]
struct MeasurementRow {
    measured_at: DateTime<Utc>,
    cumulative_kwh: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
struct InsertedForecastRow {
    id: i64,
    created_at: DateTime<Utc>,
}

/// PostgreSQL-backed storage.
///
/// Every call opens its own connection and closes it before returning, on
/// success and failure alike. Nothing is pooled between calls.
pub struct PgRepo {
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgRepo {
    pub fn new(cfg: &DbConfig) -> Result<Self, StorageError> {
        let options: PgConnectOptions = cfg
            .url
            .parse()
            .map_err(|e: sqlx::Error| StorageError::Connect(format!("invalid db.url: {e}")))?;
        Ok(Self {
            options,
            connect_timeout: cfg.connect_timeout(),
        })
    }

    async fn connect(&self) -> Result<PgConnection, StorageError> {
        match tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&self.options))
            .await
        {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(StorageError::Connect(e.to_string())),
            Err(_) => Err(StorageError::Connect(format!(
                "timed out after {}s",
                self.connect_timeout.as_secs()
            ))),
        }
    }

    async fn release(conn: PgConnection) {
        if let Err(e) = conn.close().await {
            warn!(error = %e, "failed to close storage connection cleanly");
        }
    }

    pub async fn apply_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::raw_sql(SCHEMA).execute(&mut conn).await;
        Self::release(conn).await;
        result.map_err(|e| StorageError::Query(e.to_string()))?;
        info!("storage schema applied");
        Ok(())
    }
}

#[async_trait]
impl MeasurementReader for PgRepo {
    async fn load_measurements(&self) -> Result<Vec<Measurement>, StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, MeasurementRow>(
            r#"
            SELECT measured_at, cumulative_kwh
            FROM measurement
            WHERE cumulative_kwh IS NOT NULL
            ORDER BY measured_at
            "#,
        )
        .fetch_all(&mut conn)
        .await;
        Self::release(conn).await;

        let rows = result.map_err(|e| StorageError::Query(e.to_string()))?;
        let measurements: Vec<Measurement> = rows
            .into_iter()
            .filter_map(|row| {
                row.cumulative_kwh
                    .map(|kwh| Measurement::new(row.measured_at, kwh))
            })
            .collect();

        debug!(rows = measurements.len(), "loaded measurements");
        Ok(measurements)
    }
}

#[async_trait]
impl ForecastWriter for PgRepo {
    async fn save_forecast(&self, forecast: &NewForecast) -> Result<ForecastResult, StorageError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, InsertedForecastRow>(
            r#"
            INSERT INTO forecast (forecast_start, forecast_end, predicted_kwh, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(forecast.window.start)
        .bind(forecast.window.end)
        .bind(forecast.predicted_total_kwh)
        .fetch_one(&mut conn)
        .await;
        Self::release(conn).await;

        let row = result.map_err(|e| StorageError::Query(e.to_string()))?;
        debug!(id = row.id, "forecast row inserted");

        Ok(ForecastResult {
            id: row.id,
            window_start: forecast.window.start,
            window_end: forecast.window.end,
            predicted_total_kwh: forecast.predicted_total_kwh,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl StorageProbe for PgRepo {
    async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.connect().await?;
        let result = conn.ping().await;
        Self::release(conn).await;
        result.map_err(|e| StorageError::Query(e.to_string()))
    }
}
